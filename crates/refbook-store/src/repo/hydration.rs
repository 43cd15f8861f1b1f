//! Hydration layer - loads the catalog from SQLite into the in-memory `Store`
//!
//! Rows are read in id order so the resulting store is deterministic.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::repo::SqliteRepo;
use refbook_core::ops::Store;
use rusqlite::Connection;

/// Load every book, version and element into a fresh `Store`
pub fn load_catalog(conn: &Connection) -> Result<Store> {
    let mut store = Store::new();

    for book in SqliteRepo::list_books(conn)? {
        store.insert_book(book);
    }
    for version in SqliteRepo::list_versions(conn)? {
        store.insert_version(version);
    }
    for element in SqliteRepo::list_elements(conn)? {
        store.insert_element(element);
    }

    tracing::debug!(
        books = store.book_count(),
        versions = store.version_count(),
        elements = store.element_count(),
        "hydrated catalog"
    );
    Ok(store)
}

/// Load one book with its versions and their elements
///
/// Returns an empty store if the book does not exist.
pub fn load_book(conn: &Connection, book_id: i64) -> Result<Store> {
    let mut store = Store::new();
    let Some(book) = SqliteRepo::get_book(conn, book_id)? else {
        return Ok(store);
    };
    store.insert_book(book);

    for version in SqliteRepo::list_versions_for_book(conn, book_id)? {
        let version_id = version.id;
        store.insert_version(version);
        for element in SqliteRepo::list_elements_for_version(conn, version_id)? {
            store.insert_element(element);
        }
    }
    Ok(store)
}
