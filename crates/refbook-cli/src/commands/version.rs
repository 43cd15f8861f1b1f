//! Reference book version commands
//!
//! Usage:
//!   refbook version list [--limit N] [--cursor C]
//!   refbook version show <ID>
//!   refbook version create --book <BOOK_ID> --version <LABEL> --date <YYYY-MM-DD>
//!   refbook version update <ID> [--version L] [--date D]
//!   refbook version delete <ID>

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use refbook_core::admin::render::{render_list, render_version_detail};
use refbook_core::admin::ModelKind;
use refbook_core::ops::version_ops::VersionUpdate;
use refbook_engine::commands::read_tools::ListOptions;
use refbook_engine::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
    EngineQueryResult,
};

use super::{parse_date_arg, print_json, CliContext, CliResult};

#[derive(Debug, Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommand,
}

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// List versions with their book
    List(ListArgs),
    /// Show one version with its elements
    Show(ShowArgs),
    /// Add a dated version to a book
    Create(CreateArgs),
    /// Change the label or effective date of a version
    Update(UpdateArgs),
    /// Delete a version and its elements
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub cursor: Option<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Owning book id
    #[arg(long)]
    pub book: i64,
    /// Version label
    #[arg(long)]
    pub version: String,
    /// Effective date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub date: NaiveDate,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub version: Option<String>,
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: i64,
}

/// Execute version command
pub fn execute(args: VersionArgs, ctx: &CliContext) -> CliResult {
    match args.command {
        VersionCommand::List(a) => execute_list(a, ctx),
        VersionCommand::Show(a) => execute_show(a, ctx),
        VersionCommand::Create(a) => execute_create(a, ctx),
        VersionCommand::Update(a) => execute_update(a, ctx),
        VersionCommand::Delete(a) => execute_delete(a, ctx),
    }
}

fn execute_list(args: ListArgs, ctx: &CliContext) -> CliResult {
    let conn = ctx.open()?;
    let result = apply_engine_query(
        EngineQuery::VersionList(ListOptions {
            limit: args.limit,
            cursor: args.cursor,
            search: None,
        }),
        &conn,
    )?;
    let EngineQueryResult::VersionList(page) = result else {
        return Err("unexpected query result".into());
    };

    if args.json {
        return print_json(&page);
    }
    print!("{}", render_list(ctx.admin(ModelKind::Version)?, &page.items));
    if let Some(cursor) = page.cursor {
        println!("\nNext page: --cursor {}", cursor);
    }
    Ok(())
}

fn execute_show(args: ShowArgs, ctx: &CliContext) -> CliResult {
    let conn = ctx.open()?;
    let result = apply_engine_query(EngineQuery::VersionGet { version_id: args.id }, &conn)?;
    let EngineQueryResult::VersionGet(detail) = result else {
        return Err("unexpected query result".into());
    };

    if args.json {
        return print_json(&detail);
    }
    print!(
        "{}",
        render_version_detail(
            ctx.admin(ModelKind::Version)?,
            &detail.version,
            &detail.elements,
        )
    );
    Ok(())
}

fn execute_create(args: CreateArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;
    let result = apply_engine_command(
        EngineCommand::VersionCreate {
            book_id: args.book,
            version: args.version,
            date: args.date,
        },
        &mut conn,
    )?;
    if let EngineCommandResult::Version(v) = result {
        println!(
            "Created version {} ({}, effective {}) in book {}",
            v.id, v.version, v.date, v.ref_book_id
        );
    }
    Ok(())
}

fn execute_update(args: UpdateArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;
    let result = apply_engine_command(
        EngineCommand::VersionUpdate {
            version_id: args.id,
            update: VersionUpdate {
                version: args.version,
                date: args.date,
            },
        },
        &mut conn,
    )?;
    if let EngineCommandResult::Version(v) = result {
        println!("Updated version {} ({}, effective {})", v.id, v.version, v.date);
    }
    Ok(())
}

fn execute_delete(args: DeleteArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;
    apply_engine_command(
        EngineCommand::VersionDelete {
            version_id: args.id,
        },
        &mut conn,
    )?;
    println!("Deleted version {}", args.id);
    Ok(())
}
