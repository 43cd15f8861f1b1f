//! Current-version resolution in SQL
//!
//! The current version of a book is picked by a correlated subquery that
//! returns the id of the top version per book:
//!
//! ```sql
//! SELECT v.id FROM ref_book_versions v
//! WHERE v.ref_book_id = b.id AND v.date <= :date
//! ORDER BY v.date DESC, v.id DESC LIMIT 1
//! ```
//!
//! The outer query joins that single row back, so label and date always come
//! from the same version. `idx_ref_book_versions_book_date` covers the lookup.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;

use chrono::NaiveDate;
use refbook_core::model::ReferenceBook;
use refbook_core::ops::validation::validate_date;
use refbook_core::resolver::{AnnotatedBook, CurrentVersion};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::errors::{from_rusqlite, Result};

const CURRENT_VERSION_JOIN: &str = "
    LEFT JOIN ref_book_versions cv ON cv.id = (
        SELECT v.id FROM ref_book_versions v
        WHERE v.ref_book_id = b.id AND v.date <= ?1
        ORDER BY v.date DESC, v.id DESC
        LIMIT 1
    )";

/// Filter and keyset window for the annotated book list
#[derive(Debug, Clone)]
pub struct BookListFilter {
    pub reference_date: NaiveDate,
    /// Case-insensitive substring match on code or name
    pub search: Option<String>,
    /// Only books with `id > after_id`
    pub after_id: Option<i64>,
    pub limit: usize,
}

impl BookListFilter {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            search: None,
            after_id: None,
            limit: 100,
        }
    }
}

fn current_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<CurrentVersion>> {
    let version_id: Option<i64> = row.get(offset)?;
    let version: Option<String> = row.get(offset + 1)?;
    let date: Option<NaiveDate> = row.get(offset + 2)?;
    Ok(match (version_id, version, date) {
        (Some(version_id), Some(version), Some(date)) => Some(CurrentVersion {
            version_id,
            version,
            date,
        }),
        _ => None,
    })
}

/// Escape LIKE wildcards so the search term matches literally
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Current version of one book on `reference_date`
///
/// Unknown books and books without an effective version both yield `None`.
///
/// # Errors
///
/// `InvalidInput` if the reference year is not four digits.
pub fn resolve_current_version(
    conn: &Connection,
    book_id: i64,
    reference_date: NaiveDate,
) -> Result<Option<CurrentVersion>> {
    let reference_date = validate_date(reference_date)?;
    conn.query_row(
        "SELECT id, version, date FROM ref_book_versions
         WHERE ref_book_id = ?2 AND date <= ?1
         ORDER BY date DESC, id DESC
         LIMIT 1",
        rusqlite::params![reference_date, book_id],
        |row| {
            Ok(CurrentVersion {
                version_id: row.get(0)?,
                version: row.get(1)?,
                date: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Current versions of several books in one statement
///
/// Every requested id is present in the result; unknown ids map to `None`.
pub fn resolve_current_versions(
    conn: &Connection,
    book_ids: &[i64],
    reference_date: NaiveDate,
) -> Result<BTreeMap<i64, Option<CurrentVersion>>> {
    let reference_date = validate_date(reference_date)?;
    let mut resolved: BTreeMap<i64, Option<CurrentVersion>> =
        book_ids.iter().map(|id| (*id, None)).collect();
    if book_ids.is_empty() {
        return Ok(resolved);
    }

    let placeholders = (0..book_ids.len())
        .map(|i| format!("?{}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT b.id, cv.id, cv.version, cv.date
         FROM ref_books b {}
         WHERE b.id IN ({})",
        CURRENT_VERSION_JOIN, placeholders
    );

    let mut params: Vec<Value> = Vec::with_capacity(book_ids.len() + 1);
    params.push(Value::Text(reference_date.format("%Y-%m-%d").to_string()));
    params.extend(book_ids.iter().map(|id| Value::Integer(*id)));

    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), |row| {
            Ok((row.get::<_, i64>(0)?, current_from_row(row, 1)?))
        })
        .map_err(from_rusqlite)?;

    for row in rows {
        let (book_id, current) = row.map_err(from_rusqlite)?;
        resolved.insert(book_id, current);
    }
    Ok(resolved)
}

/// Book list rows annotated with their current version, ordered by id
///
/// One statement regardless of how many books are listed.
pub fn list_books_with_current_version(
    conn: &Connection,
    filter: &BookListFilter,
) -> Result<Vec<AnnotatedBook>> {
    let reference_date = validate_date(filter.reference_date)?;
    let sql = format!(
        r#"SELECT b.id, b.code, b.name, b.description, cv.id, cv.version, cv.date
           FROM ref_books b {}
           WHERE b.id > ?2
             AND (?3 IS NULL OR b.code LIKE ?3 ESCAPE '\' OR b.name LIKE ?3 ESCAPE '\')
           ORDER BY b.id
           LIMIT ?4"#,
        CURRENT_VERSION_JOIN
    );

    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(
            rusqlite::params![
                reference_date,
                filter.after_id.unwrap_or(i64::MIN),
                search,
                i64::try_from(filter.limit).unwrap_or(i64::MAX),
            ],
            |row| {
                Ok(AnnotatedBook {
                    book: ReferenceBook {
                        id: row.get(0)?,
                        code: row.get(1)?,
                        name: row.get(2)?,
                        description: row.get(3)?,
                    },
                    current: current_from_row(row, 4)?,
                })
            },
        )
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    tracing::debug!(row_count = rows.len(), "listed books with current version");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("ok"), "%ok%");
    }
}
