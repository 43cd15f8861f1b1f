//! Reference book element commands
//!
//! Usage:
//!   refbook element list --version-id <ID>
//!   refbook element create --version-id <ID> --code C --value V
//!   refbook element update <ID> [--code C] [--value V]
//!   refbook element delete <ID>

use clap::{Args, Subcommand};
use refbook_core::admin::render::render_list;
use refbook_core::admin::ModelKind;
use refbook_core::ops::element_ops::ElementUpdate;
use refbook_engine::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
    EngineQueryResult,
};

use super::{print_json, CliContext, CliResult};

#[derive(Debug, Args)]
pub struct ElementArgs {
    #[command(subcommand)]
    pub command: ElementCommand,
}

#[derive(Debug, Subcommand)]
pub enum ElementCommand {
    /// List the elements of a version
    List(ListArgs),
    /// Add an element to a version
    Create(CreateArgs),
    /// Change the code or value of an element
    Update(UpdateArgs),
    /// Delete an element
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub version_id: i64,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub version_id: i64,
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub value: String,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: i64,
}

/// Execute element command
pub fn execute(args: ElementArgs, ctx: &CliContext) -> CliResult {
    match args.command {
        ElementCommand::List(a) => execute_list(a, ctx),
        ElementCommand::Create(a) => execute_create(a, ctx),
        ElementCommand::Update(a) => execute_update(a, ctx),
        ElementCommand::Delete(a) => execute_delete(a, ctx),
    }
}

fn execute_list(args: ListArgs, ctx: &CliContext) -> CliResult {
    let conn = ctx.open()?;
    let result = apply_engine_query(
        EngineQuery::ElementList {
            version_id: args.version_id,
        },
        &conn,
    )?;
    let EngineQueryResult::ElementList(elements) = result else {
        return Err("unexpected query result".into());
    };

    if args.json {
        return print_json(&elements);
    }
    print!("{}", render_list(ctx.admin(ModelKind::Element)?, &elements));
    Ok(())
}

fn execute_create(args: CreateArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;
    let result = apply_engine_command(
        EngineCommand::ElementCreate {
            version_id: args.version_id,
            code: args.code,
            value: args.value,
        },
        &mut conn,
    )?;
    if let EngineCommandResult::Element(e) = result {
        println!("Created element {} ({}) in version {}", e.id, e.code, e.version_id);
    }
    Ok(())
}

fn execute_update(args: UpdateArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;
    let result = apply_engine_command(
        EngineCommand::ElementUpdate {
            element_id: args.id,
            update: ElementUpdate {
                code: args.code,
                value: args.value,
            },
        },
        &mut conn,
    )?;
    if let EngineCommandResult::Element(e) = result {
        println!("Updated element {} ({})", e.id, e.code);
    }
    Ok(())
}

fn execute_delete(args: DeleteArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;
    apply_engine_command(
        EngineCommand::ElementDelete {
            element_id: args.id,
        },
        &mut conn,
    )?;
    println!("Deleted element {}", args.id);
    Ok(())
}
