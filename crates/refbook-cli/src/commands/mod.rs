//! CLI subcommands

pub mod book;
pub mod element;
pub mod resolve;
pub mod seed;
pub mod version;

use chrono::NaiveDate;
use refbook_core::admin::{AdminSite, ModelAdmin, ModelKind};
use refbook_core::model::parse_date;
use rusqlite::Connection;
use std::path::PathBuf;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Shared state for one CLI invocation
pub struct CliContext {
    db: PathBuf,
    site: AdminSite,
}

impl CliContext {
    pub fn new(db: PathBuf) -> Self {
        Self {
            db,
            site: AdminSite::with_defaults(),
        }
    }

    /// Open the catalog, creating and migrating it if needed
    pub fn open(&self) -> Result<Connection, Box<dyn std::error::Error>> {
        Ok(refbook_store::db::open_catalog(&self.db)?)
    }

    pub fn admin(&self, model: ModelKind) -> Result<&ModelAdmin, Box<dyn std::error::Error>> {
        self.site
            .get(model)
            .ok_or_else(|| format!("no admin view registered for {:?}", model).into())
    }
}

/// clap value parser for `YYYY-MM-DD` arguments
pub(crate) fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

/// Print a serializable value as pretty JSON
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
