//! Current-version resolution
//!
//! Usage: refbook resolve <BOOK_ID> [--date YYYY-MM-DD] [--json]

use chrono::NaiveDate;
use clap::Args;
use refbook_core::admin::EMPTY_CURRENT_VERSION;
use refbook_engine::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::{parse_date_arg, print_json, CliContext, CliResult};

#[derive(Debug, Args)]
pub struct ResolveArgs {
    pub book_id: i64,
    /// Reference date; defaults to today
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub json: bool,
}

/// Execute resolve command
pub fn execute(args: ResolveArgs, ctx: &CliContext) -> CliResult {
    let conn = ctx.open()?;
    let result = apply_engine_query(
        EngineQuery::CurrentVersion {
            book_id: args.book_id,
            reference_date: args.date,
        },
        &conn,
    )?;
    let EngineQueryResult::CurrentVersion(resolved) = result else {
        return Err("unexpected query result".into());
    };

    if args.json {
        return print_json(&resolved);
    }
    match resolved.current {
        Some(cv) => println!("{}\t{}", cv.version, cv.date),
        None => println!("{}", EMPTY_CURRENT_VERSION),
    }
    Ok(())
}
