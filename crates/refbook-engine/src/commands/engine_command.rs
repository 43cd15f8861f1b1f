//! Engine-level mutating commands.
//!
//! Field rules (trimming, emptiness, date range, per-parent uniqueness) come
//! from the core operations. Creates and updates hydrate the affected book
//! into a `Store`, apply the core op there, and persist the resulting row;
//! the datastore assigns ids on insert. Catalog-wide book code uniqueness is
//! left to the `UNIQUE` constraint, so book creates run against an empty
//! `Store`.

#![allow(clippy::result_large_err)]

use std::path::PathBuf;

use chrono::NaiveDate;
use refbook_core::model::{ReferenceBook, ReferenceBookElement, ReferenceBookVersion};
use refbook_core::ops::book_ops::{self, BookUpdate};
use refbook_core::ops::element_ops::{self, ElementUpdate};
use refbook_core::ops::version_ops::{self, VersionUpdate};
use refbook_core::ops::Store;
use refbook_core_types::RequestContext;
use refbook_store::errors::{not_found, Result};
use refbook_store::repo::hydration::load_book;
use refbook_store::repo::SqliteRepo;
use refbook_store::seed::{import_seed, ImportSummary};
use rusqlite::Connection;

use crate::commands::instrumented;

/// Commands that write to the catalog.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    BookCreate {
        code: String,
        name: String,
        description: Option<String>,
    },
    BookUpdate {
        book_id: i64,
        update: BookUpdate,
    },
    /// Deletes the book's versions and elements too.
    BookDelete { book_id: i64 },

    VersionCreate {
        book_id: i64,
        version: String,
        date: NaiveDate,
    },
    VersionUpdate {
        version_id: i64,
        update: VersionUpdate,
    },
    VersionDelete { version_id: i64 },

    ElementCreate {
        version_id: i64,
        code: String,
        value: String,
    },
    ElementUpdate {
        element_id: i64,
        update: ElementUpdate,
    },
    ElementDelete { element_id: i64 },

    /// Import a YAML seed file.
    SeedImport { path: PathBuf },
}

/// Result of applying an engine command.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommandResult {
    /// Book as stored after create/update.
    Book(ReferenceBook),
    Version(ReferenceBookVersion),
    Element(ReferenceBookElement),
    /// Id of the deleted row.
    Deleted { id: i64 },
    SeedImport(ImportSummary),
}

/// Id of the book owning `version_id`
fn book_of_version(conn: &Connection, version_id: i64) -> Result<i64> {
    SqliteRepo::get_version(conn, version_id)?
        .map(|v| v.ref_book_id)
        .ok_or_else(|| not_found("Reference book version", version_id))
}

/// Apply a mutating command.
///
/// # Errors
///
/// `InvalidInput` for fields failing validation, `NotFound` for unknown ids,
/// `AlreadyExists` for duplicate codes or labels, `Persistence` for datastore
/// failures.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
) -> Result<EngineCommandResult> {
    apply_engine_command_with_context(cmd, conn, &RequestContext::new())
}

/// Apply a mutating command under an existing request context.
pub fn apply_engine_command_with_context(
    cmd: EngineCommand,
    conn: &mut Connection,
    ctx: &RequestContext,
) -> Result<EngineCommandResult> {
    match cmd {
        // ── Book ──────────────────────────────────────────────────────────────
        EngineCommand::BookCreate {
            code,
            name,
            description,
        } => instrumented("book_create", ctx, || {
            let mut store = Store::new();
            let draft_id = book_ops::create_book(&mut store, &code, &name, description)?;
            let mut book = store.get_book(draft_id)?.clone();
            book.id = SqliteRepo::insert_book(
                conn,
                &book.code,
                &book.name,
                book.description.as_deref(),
            )?;
            Ok(EngineCommandResult::Book(book))
        }),

        EngineCommand::BookUpdate { book_id, update } => instrumented("book_update", ctx, || {
            let mut store = load_book(conn, book_id)?;
            book_ops::update_book(&mut store, book_id, update)?;
            let book = store.get_book(book_id)?.clone();
            SqliteRepo::update_book(conn, &book)?;
            Ok(EngineCommandResult::Book(book))
        }),

        EngineCommand::BookDelete { book_id } => instrumented("book_delete", ctx, || {
            SqliteRepo::delete_book(conn, book_id)?;
            Ok(EngineCommandResult::Deleted { id: book_id })
        }),

        // ── Version ───────────────────────────────────────────────────────────
        EngineCommand::VersionCreate {
            book_id,
            version,
            date,
        } => instrumented("version_create", ctx, || {
            let mut store = load_book(conn, book_id)?;
            let draft_id = version_ops::create_version(&mut store, book_id, &version, date)?;
            let mut version = store.get_version(draft_id)?.clone();
            version.id =
                SqliteRepo::insert_version(conn, book_id, &version.version, version.date)?;
            Ok(EngineCommandResult::Version(version))
        }),

        EngineCommand::VersionUpdate { version_id, update } => {
            instrumented("version_update", ctx, || {
                let mut store = load_book(conn, book_of_version(conn, version_id)?)?;
                version_ops::update_version(&mut store, version_id, update)?;
                let version = store.get_version(version_id)?.clone();
                SqliteRepo::update_version(conn, &version)?;
                Ok(EngineCommandResult::Version(version))
            })
        }

        EngineCommand::VersionDelete { version_id } => instrumented("version_delete", ctx, || {
            SqliteRepo::delete_version(conn, version_id)?;
            Ok(EngineCommandResult::Deleted { id: version_id })
        }),

        // ── Element ───────────────────────────────────────────────────────────
        EngineCommand::ElementCreate {
            version_id,
            code,
            value,
        } => instrumented("element_create", ctx, || {
            let mut store = load_book(conn, book_of_version(conn, version_id)?)?;
            let draft_id = element_ops::create_element(&mut store, version_id, &code, &value)?;
            let mut element = store.get_element(draft_id)?.clone();
            element.id =
                SqliteRepo::insert_element(conn, version_id, &element.code, &element.value)?;
            Ok(EngineCommandResult::Element(element))
        }),

        EngineCommand::ElementUpdate { element_id, update } => {
            instrumented("element_update", ctx, || {
                let version_id = SqliteRepo::get_element(conn, element_id)?
                    .ok_or_else(|| not_found("Reference book element", element_id))?
                    .version_id;
                let mut store = load_book(conn, book_of_version(conn, version_id)?)?;
                element_ops::update_element(&mut store, element_id, update)?;
                let element = store.get_element(element_id)?.clone();
                SqliteRepo::update_element(conn, &element)?;
                Ok(EngineCommandResult::Element(element))
            })
        }

        EngineCommand::ElementDelete { element_id } => instrumented("element_delete", ctx, || {
            SqliteRepo::delete_element(conn, element_id)?;
            Ok(EngineCommandResult::Deleted { id: element_id })
        }),

        // ── Seed ──────────────────────────────────────────────────────────────
        EngineCommand::SeedImport { path } => instrumented("seed_import", ctx, || {
            let summary = import_seed(&path, conn)?;
            Ok(EngineCommandResult::SeedImport(summary))
        }),
    }
}
