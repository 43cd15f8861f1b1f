//! Reference book commands
//!
//! Usage:
//!   refbook book list [--search S] [--limit N] [--cursor C] [--date D]
//!   refbook book show <ID> [--date D]
//!   refbook book create --code C --name N [--description D]
//!   refbook book update <ID> [--code C] [--name N] [--description D | --clear-description]
//!   refbook book delete <ID>

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use refbook_core::admin::render::{render_book_detail, render_list};
use refbook_core::admin::ModelKind;
use refbook_core::ops::book_ops::BookUpdate;
use refbook_engine::commands::read_tools::ListOptions;
use refbook_engine::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
    EngineQueryResult,
};

use super::{parse_date_arg, print_json, CliContext, CliResult};

#[derive(Debug, Args)]
pub struct BookArgs {
    #[command(subcommand)]
    pub command: BookCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookCommand {
    /// List books with their current version
    List(ListArgs),
    /// Show one book with its versions
    Show(ShowArgs),
    /// Create a book
    Create(CreateArgs),
    /// Change fields of a book
    Update(UpdateArgs),
    /// Delete a book with all of its versions and elements
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Substring of code or name
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub limit: Option<usize>,
    /// Cursor printed by the previous page
    #[arg(long)]
    pub cursor: Option<String>,
    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Print JSON instead of Markdown
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: i64,
}

/// Execute book command
pub fn execute(args: BookArgs, ctx: &CliContext) -> CliResult {
    match args.command {
        BookCommand::List(a) => execute_list(a, ctx),
        BookCommand::Show(a) => execute_show(a, ctx),
        BookCommand::Create(a) => execute_create(a, ctx),
        BookCommand::Update(a) => execute_update(a, ctx),
        BookCommand::Delete(a) => execute_delete(a, ctx),
    }
}

fn execute_list(args: ListArgs, ctx: &CliContext) -> CliResult {
    let conn = ctx.open()?;
    let result = apply_engine_query(
        EngineQuery::BookList {
            options: ListOptions {
                limit: args.limit,
                cursor: args.cursor,
                search: args.search,
            },
            reference_date: args.date,
        },
        &conn,
    )?;
    let EngineQueryResult::BookList(list) = result else {
        return Err("unexpected query result".into());
    };

    if args.json {
        return print_json(&list);
    }
    print!("{}", render_list(ctx.admin(ModelKind::Book)?, &list.page.items));
    println!("\n_Current versions as of {}._", list.reference_date);
    if let Some(cursor) = list.page.cursor {
        println!("\nNext page: --cursor {}", cursor);
    }
    Ok(())
}

fn execute_show(args: ShowArgs, ctx: &CliContext) -> CliResult {
    let conn = ctx.open()?;
    let result = apply_engine_query(
        EngineQuery::BookGet {
            book_id: args.id,
            reference_date: args.date,
        },
        &conn,
    )?;
    let EngineQueryResult::BookGet(detail) = result else {
        return Err("unexpected query result".into());
    };

    if args.json {
        return print_json(&detail);
    }
    print!(
        "{}",
        render_book_detail(
            ctx.admin(ModelKind::Book)?,
            &detail.book,
            detail.current.as_ref(),
            &detail.versions,
        )
    );
    Ok(())
}

fn execute_create(args: CreateArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;
    let result = apply_engine_command(
        EngineCommand::BookCreate {
            code: args.code,
            name: args.name,
            description: args.description,
        },
        &mut conn,
    )?;
    if let EngineCommandResult::Book(book) = result {
        println!("Created book {} ({})", book.id, book.code);
    }
    Ok(())
}

fn execute_update(args: UpdateArgs, ctx: &CliContext) -> CliResult {
    let description = if args.clear_description {
        Some(None)
    } else {
        args.description.map(Some)
    };
    let mut conn = ctx.open()?;
    let result = apply_engine_command(
        EngineCommand::BookUpdate {
            book_id: args.id,
            update: BookUpdate {
                code: args.code,
                name: args.name,
                description,
            },
        },
        &mut conn,
    )?;
    if let EngineCommandResult::Book(book) = result {
        println!("Updated book {} ({})", book.id, book.code);
    }
    Ok(())
}

fn execute_delete(args: DeleteArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;
    apply_engine_command(EngineCommand::BookDelete { book_id: args.id }, &mut conn)?;
    println!("Deleted book {}", args.id);
    Ok(())
}
