//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for every read. It takes a
//! shared connection and never writes.

#![allow(clippy::result_large_err)]

use chrono::NaiveDate;
use refbook_core::model::{ReferenceBookElement, VersionWithBook};
use refbook_core::resolver::today;
use refbook_core_types::RequestContext;
use refbook_store::errors::{not_found, Result};
use refbook_store::repo::{self, BookListFilter, SqliteRepo};
use rusqlite::Connection;

use crate::commands::instrumented;
use crate::commands::read_tools::{
    BookGetResult, BookListResult, CurrentVersionResult, ListOptions, Page, VersionGetResult,
};

/// Read-only queries supported by the engine.
///
/// A `reference_date` of `None` means the caller's local date.
#[derive(Debug, Clone)]
pub enum EngineQuery {
    // ── Book ──────────────────────────────────────────────────────────────────
    /// Paginated book list annotated with each book's current version.
    BookList {
        options: ListOptions,
        reference_date: Option<NaiveDate>,
    },
    /// One book with its current version and inline versions.
    BookGet {
        book_id: i64,
        reference_date: Option<NaiveDate>,
    },

    // ── Version ───────────────────────────────────────────────────────────────
    /// Paginated version list joined with the owning book.
    VersionList(ListOptions),
    /// One version with its owning book and inline elements.
    VersionGet { version_id: i64 },

    // ── Element ───────────────────────────────────────────────────────────────
    /// Elements of one version.
    ElementList { version_id: i64 },

    // ── Resolution ────────────────────────────────────────────────────────────
    /// Current version of one book.
    CurrentVersion {
        book_id: i64,
        reference_date: Option<NaiveDate>,
    },
}

/// All possible results from `apply_engine_query`.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineQueryResult {
    BookList(BookListResult),
    BookGet(BookGetResult),
    VersionList(Page<VersionWithBook>),
    VersionGet(VersionGetResult),
    ElementList(Vec<ReferenceBookElement>),
    CurrentVersion(CurrentVersionResult),
}

/// Execute a read-only query.
///
/// # Errors
///
/// `NotFound` for unknown book/version ids in `BookGet`, `VersionGet` and
/// `ElementList`; `InvalidInput` for a malformed cursor; `Persistence` for
/// datastore failures. `CurrentVersion` on an unknown book is not an error.
pub fn apply_engine_query(query: EngineQuery, conn: &Connection) -> Result<EngineQueryResult> {
    apply_engine_query_with_context(query, conn, &RequestContext::new())
}

/// Execute a read-only query under an existing request context.
pub fn apply_engine_query_with_context(
    query: EngineQuery,
    conn: &Connection,
    ctx: &RequestContext,
) -> Result<EngineQueryResult> {
    match query {
        // ── BookList ──────────────────────────────────────────────────────────
        EngineQuery::BookList {
            options,
            reference_date,
        } => instrumented("book_list", ctx, || {
            let reference_date = reference_date.unwrap_or_else(today);
            let limit = options.effective_limit();
            let filter = BookListFilter {
                reference_date,
                search: options.search.clone(),
                after_id: options.decode_cursor()?,
                limit: options.fetch_limit(),
            };
            let raw = repo::list_books_with_current_version(conn, &filter)?;
            tracing::debug!(row_count = raw.len(), %reference_date, "book list fetched");
            Ok(EngineQueryResult::BookList(BookListResult {
                reference_date,
                page: Page::from_overshot(raw, limit, |row| row.book.id),
            }))
        }),

        // ── BookGet ───────────────────────────────────────────────────────────
        EngineQuery::BookGet {
            book_id,
            reference_date,
        } => instrumented("book_get", ctx, || {
            let reference_date = reference_date.unwrap_or_else(today);
            let book = SqliteRepo::get_book(conn, book_id)?
                .ok_or_else(|| not_found("Reference book", book_id))?;
            let current = repo::resolve_current_version(conn, book_id, reference_date)?;
            let versions = SqliteRepo::list_versions_for_book(conn, book_id)?;
            Ok(EngineQueryResult::BookGet(BookGetResult {
                book,
                reference_date,
                current,
                versions,
            }))
        }),

        // ── VersionList ───────────────────────────────────────────────────────
        EngineQuery::VersionList(options) => instrumented("version_list", ctx, || {
            let limit = options.effective_limit();
            let after_id = options.decode_cursor()?;
            let raw =
                SqliteRepo::list_versions_with_book(conn, after_id, options.fetch_limit())?;
            Ok(EngineQueryResult::VersionList(Page::from_overshot(
                raw,
                limit,
                |row| row.version.id,
            )))
        }),

        // ── VersionGet ────────────────────────────────────────────────────────
        EngineQuery::VersionGet { version_id } => instrumented("version_get", ctx, || {
            let version = SqliteRepo::get_version_with_book(conn, version_id)?
                .ok_or_else(|| not_found("Reference book version", version_id))?;
            let elements = SqliteRepo::list_elements_for_version(conn, version_id)?;
            Ok(EngineQueryResult::VersionGet(VersionGetResult {
                version,
                elements,
            }))
        }),

        // ── ElementList ───────────────────────────────────────────────────────
        EngineQuery::ElementList { version_id } => instrumented("element_list", ctx, || {
            if SqliteRepo::get_version(conn, version_id)?.is_none() {
                return Err(not_found("Reference book version", version_id));
            }
            let elements = SqliteRepo::list_elements_for_version(conn, version_id)?;
            Ok(EngineQueryResult::ElementList(elements))
        }),

        // ── CurrentVersion ────────────────────────────────────────────────────
        EngineQuery::CurrentVersion {
            book_id,
            reference_date,
        } => instrumented("current_version", ctx, || {
            let reference_date = reference_date.unwrap_or_else(today);
            let current = repo::resolve_current_version(conn, book_id, reference_date)?;
            Ok(EngineQueryResult::CurrentVersion(CurrentVersionResult {
                book_id,
                reference_date,
                current,
            }))
        }),
    }
}
