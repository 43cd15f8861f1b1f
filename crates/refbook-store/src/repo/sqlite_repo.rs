//! SQLite repository implementation
//!
//! Inserts, updates, deletes and reads books, versions and elements. Every
//! function takes a `&Connection`, so callers inside a transaction pass the
//! `Transaction` (it derefs to `Connection`).

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, not_found, Result};
use refbook_core::model::{
    ReferenceBook, ReferenceBookElement, ReferenceBookVersion, VersionWithBook,
};
use refbook_core::ops::validation::validate_date;
use rusqlite::{Connection, OptionalExtension, Row};

const BOOK_COLUMNS: &str = "id, code, name, description";
const VERSION_COLUMNS: &str = "id, ref_book_id, version, date";
const ELEMENT_COLUMNS: &str = "id, version_id, code, value";

pub(crate) fn book_from_row(row: &Row<'_>) -> rusqlite::Result<ReferenceBook> {
    Ok(ReferenceBook {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
    })
}

pub(crate) fn version_from_row(row: &Row<'_>) -> rusqlite::Result<ReferenceBookVersion> {
    Ok(ReferenceBookVersion {
        id: row.get(0)?,
        ref_book_id: row.get(1)?,
        version: row.get(2)?,
        date: row.get(3)?,
    })
}

pub(crate) fn element_from_row(row: &Row<'_>) -> rusqlite::Result<ReferenceBookElement> {
    Ok(ReferenceBookElement {
        id: row.get(0)?,
        version_id: row.get(1)?,
        code: row.get(2)?,
        value: row.get(3)?,
    })
}

fn version_with_book_from_row(row: &Row<'_>) -> rusqlite::Result<VersionWithBook> {
    Ok(VersionWithBook {
        version: version_from_row(row)?,
        book_code: row.get(4)?,
        book_name: row.get(5)?,
    })
}

fn expect_changed(changed: usize, entity: &str, id: i64) -> Result<()> {
    if changed == 0 {
        return Err(not_found(entity, id));
    }
    Ok(())
}

/// SQLite repository for reference books, versions and elements
pub struct SqliteRepo;

impl SqliteRepo {
    // ----- books -----

    /// Insert a book and return its new id
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if another book has the same code.
    pub fn insert_book(
        conn: &Connection,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO ref_books (code, name, description) VALUES (?1, ?2, ?3)",
            rusqlite::params![code, name, description],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Overwrite code, name and description of an existing book
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown; `AlreadyExists` on a code clash.
    pub fn update_book(conn: &Connection, book: &ReferenceBook) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE ref_books SET code = ?2, name = ?3, description = ?4 WHERE id = ?1",
                rusqlite::params![book.id, book.code, book.name, book.description],
            )
            .map_err(from_rusqlite)?;
        expect_changed(changed, "Reference book", book.id)
    }

    /// Delete a book; versions and elements go with it (ON DELETE CASCADE)
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub fn delete_book(conn: &Connection, book_id: i64) -> Result<()> {
        let changed = conn
            .execute("DELETE FROM ref_books WHERE id = ?1", [book_id])
            .map_err(from_rusqlite)?;
        expect_changed(changed, "Reference book", book_id)
    }

    pub fn get_book(conn: &Connection, book_id: i64) -> Result<Option<ReferenceBook>> {
        conn.query_row(
            &format!("SELECT {} FROM ref_books WHERE id = ?1", BOOK_COLUMNS),
            [book_id],
            book_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn get_book_by_code(conn: &Connection, code: &str) -> Result<Option<ReferenceBook>> {
        conn.query_row(
            &format!("SELECT {} FROM ref_books WHERE code = ?1", BOOK_COLUMNS),
            [code],
            book_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// All books ordered by id
    pub fn list_books(conn: &Connection) -> Result<Vec<ReferenceBook>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM ref_books ORDER BY id", BOOK_COLUMNS))
            .map_err(from_rusqlite)?;
        let books = stmt
            .query_map([], book_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(books)
    }

    // ----- versions -----

    /// # Errors
    ///
    /// `ConstraintViolation` if the book does not exist; `AlreadyExists` if
    /// the book already has this label; `InvalidInput` if the year is not
    /// four digits.
    pub fn insert_version(
        conn: &Connection,
        book_id: i64,
        version: &str,
        date: chrono::NaiveDate,
    ) -> Result<i64> {
        let date = validate_date(date)?;
        conn.execute(
            "INSERT INTO ref_book_versions (ref_book_id, version, date) VALUES (?1, ?2, ?3)",
            rusqlite::params![book_id, version, date],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// # Errors
    ///
    /// `NotFound` if the id is unknown; `AlreadyExists` on a label clash;
    /// `InvalidInput` if the year is not four digits.
    pub fn update_version(conn: &Connection, version: &ReferenceBookVersion) -> Result<()> {
        validate_date(version.date)?;
        let changed = conn
            .execute(
                "UPDATE ref_book_versions SET version = ?2, date = ?3 WHERE id = ?1",
                rusqlite::params![version.id, version.version, version.date],
            )
            .map_err(from_rusqlite)?;
        expect_changed(changed, "Reference book version", version.id)
    }

    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub fn delete_version(conn: &Connection, version_id: i64) -> Result<()> {
        let changed = conn
            .execute("DELETE FROM ref_book_versions WHERE id = ?1", [version_id])
            .map_err(from_rusqlite)?;
        expect_changed(changed, "Reference book version", version_id)
    }

    pub fn get_version(conn: &Connection, version_id: i64) -> Result<Option<ReferenceBookVersion>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM ref_book_versions WHERE id = ?1",
                VERSION_COLUMNS
            ),
            [version_id],
            version_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn get_version_by_label(
        conn: &Connection,
        book_id: i64,
        version: &str,
    ) -> Result<Option<ReferenceBookVersion>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM ref_book_versions WHERE ref_book_id = ?1 AND version = ?2",
                VERSION_COLUMNS
            ),
            rusqlite::params![book_id, version],
            version_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// A version together with its owning book's code and name, in one query
    pub fn get_version_with_book(
        conn: &Connection,
        version_id: i64,
    ) -> Result<Option<VersionWithBook>> {
        conn.query_row(
            "SELECT v.id, v.ref_book_id, v.version, v.date, b.code, b.name
             FROM ref_book_versions v
             JOIN ref_books b ON b.id = v.ref_book_id
             WHERE v.id = ?1",
            [version_id],
            version_with_book_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Versions of one book, oldest first (date, then id)
    pub fn list_versions_for_book(
        conn: &Connection,
        book_id: i64,
    ) -> Result<Vec<ReferenceBookVersion>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM ref_book_versions WHERE ref_book_id = ?1 ORDER BY date, id",
                VERSION_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let versions = stmt
            .query_map([book_id], version_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(versions)
    }

    /// Version list rows joined with the owning book, ordered by version id
    ///
    /// Keyset pagination: rows with `id > after_id`, at most `limit` rows.
    pub fn list_versions_with_book(
        conn: &Connection,
        after_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<VersionWithBook>> {
        let mut stmt = conn
            .prepare(
                "SELECT v.id, v.ref_book_id, v.version, v.date, b.code, b.name
                 FROM ref_book_versions v
                 JOIN ref_books b ON b.id = v.ref_book_id
                 WHERE v.id > ?1
                 ORDER BY v.id
                 LIMIT ?2",
            )
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(
                rusqlite::params![
                    after_id.unwrap_or(i64::MIN),
                    i64::try_from(limit).unwrap_or(i64::MAX)
                ],
                version_with_book_from_row,
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    /// Every version ordered by id
    pub fn list_versions(conn: &Connection) -> Result<Vec<ReferenceBookVersion>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM ref_book_versions ORDER BY id",
                VERSION_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let versions = stmt
            .query_map([], version_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(versions)
    }

    // ----- elements -----

    /// # Errors
    ///
    /// `ConstraintViolation` if the version does not exist; `AlreadyExists`
    /// if the version already has this code.
    pub fn insert_element(
        conn: &Connection,
        version_id: i64,
        code: &str,
        value: &str,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO ref_book_elements (version_id, code, value) VALUES (?1, ?2, ?3)",
            rusqlite::params![version_id, code, value],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// # Errors
    ///
    /// `NotFound` if the id is unknown; `AlreadyExists` on a code clash.
    pub fn update_element(conn: &Connection, element: &ReferenceBookElement) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE ref_book_elements SET code = ?2, value = ?3 WHERE id = ?1",
                rusqlite::params![element.id, element.code, element.value],
            )
            .map_err(from_rusqlite)?;
        expect_changed(changed, "Reference book element", element.id)
    }

    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub fn delete_element(conn: &Connection, element_id: i64) -> Result<()> {
        let changed = conn
            .execute("DELETE FROM ref_book_elements WHERE id = ?1", [element_id])
            .map_err(from_rusqlite)?;
        expect_changed(changed, "Reference book element", element_id)
    }

    pub fn get_element(conn: &Connection, element_id: i64) -> Result<Option<ReferenceBookElement>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM ref_book_elements WHERE id = ?1",
                ELEMENT_COLUMNS
            ),
            [element_id],
            element_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn get_element_by_code(
        conn: &Connection,
        version_id: i64,
        code: &str,
    ) -> Result<Option<ReferenceBookElement>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM ref_book_elements WHERE version_id = ?1 AND code = ?2",
                ELEMENT_COLUMNS
            ),
            rusqlite::params![version_id, code],
            element_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Elements of one version ordered by code, then id
    pub fn list_elements_for_version(
        conn: &Connection,
        version_id: i64,
    ) -> Result<Vec<ReferenceBookElement>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM ref_book_elements WHERE version_id = ?1 ORDER BY code, id",
                ELEMENT_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let elements = stmt
            .query_map([version_id], element_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(elements)
    }

    /// Every element ordered by id
    pub fn list_elements(conn: &Connection) -> Result<Vec<ReferenceBookElement>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM ref_book_elements ORDER BY id",
                ELEMENT_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let elements = stmt
            .query_map([], element_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_catalog_in_memory;
    use chrono::NaiveDate;
    use refbook_core::errors::ExErrorKind;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_book_round_trip() {
        let conn = open_catalog_in_memory().unwrap();
        let id = SqliteRepo::insert_book(&conn, "OKV", "Currencies", Some("ISO 4217")).unwrap();

        let book = SqliteRepo::get_book(&conn, id).unwrap().unwrap();
        assert_eq!(book.code, "OKV");
        assert_eq!(book.description.as_deref(), Some("ISO 4217"));
        assert_eq!(
            SqliteRepo::get_book_by_code(&conn, "OKV").unwrap().map(|b| b.id),
            Some(id)
        );
    }

    #[test]
    fn test_duplicate_book_code_is_already_exists() {
        let conn = open_catalog_in_memory().unwrap();
        SqliteRepo::insert_book(&conn, "OKV", "Currencies", None).unwrap();
        let err = SqliteRepo::insert_book(&conn, "OKV", "Again", None).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[test]
    fn test_version_for_missing_book_is_constraint_violation() {
        let conn = open_catalog_in_memory().unwrap();
        let err = SqliteRepo::insert_version(&conn, 99, "v1", d("2024-01-01")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let conn = open_catalog_in_memory().unwrap();
        let err = SqliteRepo::update_book(&conn, &ReferenceBook::new(5, "X", "X")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        let err = SqliteRepo::delete_element(&conn, 5).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }

    #[test]
    fn test_date_stored_as_iso_text() {
        let conn = open_catalog_in_memory().unwrap();
        let book = SqliteRepo::insert_book(&conn, "B", "Book", None).unwrap();
        SqliteRepo::insert_version(&conn, book, "v1", d("2023-06-01")).unwrap();
        let raw: String = conn
            .query_row("SELECT date FROM ref_book_versions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(raw, "2023-06-01");
    }
}
