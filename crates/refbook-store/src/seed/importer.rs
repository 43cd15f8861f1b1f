//! Seed importer orchestration
//!
//! Imports a validated seed inside one transaction. Books are matched by
//! code, versions by label within their book and elements by code within
//! their version: matches are updated in place, everything else is inserted.
//! Rows absent from the seed are left alone, so re-importing the same file
//! changes nothing but the `seed_imports` ledger.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::SqliteRepo;
use crate::seed::format_v0::SeedV0;
use crate::seed::{compute_seed_digest, parse_seed_file, parse_seed_str};
use refbook_core::model::ReferenceBook;
use refbook_core::ops::validation::{
    normalize_description, validate_code, validate_name, validate_version_label,
};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// Outcome of one seed import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub seed_digest: String,
    pub books: usize,
    pub versions: usize,
    pub elements: usize,
    /// Rows inserted (books, versions and elements together)
    pub created: usize,
    /// Existing rows whose fields changed
    pub updated: usize,
}

/// Import a seed file into the database
///
/// Returns the summary with the seed digest on success.
pub fn import_seed(path: &Path, conn: &mut Connection) -> Result<ImportSummary> {
    let seed = parse_seed_file(path)?;
    apply_seed(&seed, conn)
}

/// Import a seed given as YAML text
pub fn import_seed_str(content: &str, conn: &mut Connection) -> Result<ImportSummary> {
    let seed = parse_seed_str(content)?;
    apply_seed(&seed, conn)
}

fn apply_seed(seed: &SeedV0, conn: &mut Connection) -> Result<ImportSummary> {
    let seed_digest = compute_seed_digest(seed)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;

    let mut summary = ImportSummary {
        seed_digest,
        books: 0,
        versions: 0,
        elements: 0,
        created: 0,
        updated: 0,
    };

    for seed_book in &seed.books {
        // Parser already validated these; normalising again keeps keys trimmed
        let code = validate_code(&seed_book.code)?;
        let name = validate_name(&seed_book.name)?;
        let description = normalize_description(seed_book.description.clone());

        let book_id = match SqliteRepo::get_book_by_code(&tx, &code)? {
            Some(existing) => {
                if existing.name != name || existing.description != description {
                    let mut book = ReferenceBook::new(existing.id, code.clone(), name);
                    book.description = description;
                    SqliteRepo::update_book(&tx, &book)?;
                    summary.updated += 1;
                }
                existing.id
            }
            None => {
                summary.created += 1;
                SqliteRepo::insert_book(&tx, &code, &name, description.as_deref())?
            }
        };
        summary.books += 1;

        for seed_version in &seed_book.versions {
            let label = validate_version_label(&seed_version.version)?;

            let version_id = match SqliteRepo::get_version_by_label(&tx, book_id, &label)? {
                Some(mut existing) => {
                    if existing.date != seed_version.date {
                        existing.date = seed_version.date;
                        SqliteRepo::update_version(&tx, &existing)?;
                        summary.updated += 1;
                    }
                    existing.id
                }
                None => {
                    summary.created += 1;
                    SqliteRepo::insert_version(&tx, book_id, &label, seed_version.date)?
                }
            };
            summary.versions += 1;

            for seed_element in &seed_version.elements {
                let element_code = validate_code(&seed_element.code)?;

                match SqliteRepo::get_element_by_code(&tx, version_id, &element_code)? {
                    Some(mut existing) => {
                        if existing.value != seed_element.value {
                            existing.value = seed_element.value.clone();
                            SqliteRepo::update_element(&tx, &existing)?;
                            summary.updated += 1;
                        }
                    }
                    None => {
                        SqliteRepo::insert_element(
                            &tx,
                            version_id,
                            &element_code,
                            &seed_element.value,
                        )?;
                        summary.created += 1;
                    }
                }
                summary.elements += 1;
            }
        }
    }

    tx.execute(
        "INSERT INTO seed_imports (seed_digest, imported_at, book_count, version_count, element_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            summary.seed_digest,
            chrono::Utc::now().timestamp(),
            summary.books as i64,
            summary.versions as i64,
            summary.elements as i64,
        ],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(
        seed_digest = %summary.seed_digest,
        created = summary.created,
        updated = summary.updated,
        "seed imported"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_catalog_in_memory;
    use std::path::PathBuf;

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
    }

    #[test]
    fn test_import_minimal_seed() {
        let mut conn = open_catalog_in_memory().unwrap();
        let summary = import_seed(&fixtures_dir().join("seed_minimal.yaml"), &mut conn).unwrap();

        assert_eq!(summary.books, 1);
        assert_eq!(summary.versions, 3);
        assert_eq!(summary.created, 1 + 3 + 2);
        assert_eq!(summary.seed_digest.len(), 64);

        let ledger: i64 = conn
            .query_row("SELECT COUNT(*) FROM seed_imports", [], |row| row.get(0))
            .unwrap();
        assert_eq!(ledger, 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut conn = open_catalog_in_memory().unwrap();
        let err = import_seed(Path::new("/nonexistent/seed.yaml"), &mut conn).unwrap_err();
        assert_eq!(err.kind(), refbook_core::errors::ExErrorKind::Io);
    }

    #[test]
    fn test_update_in_place() {
        let mut conn = open_catalog_in_memory().unwrap();
        import_seed_str(
            "schema_version: 0\nbooks:\n  - { code: B, name: Old }\n",
            &mut conn,
        )
        .unwrap();
        let summary = import_seed_str(
            "schema_version: 0\nbooks:\n  - { code: B, name: New }\n",
            &mut conn,
        )
        .unwrap();
        assert_eq!((summary.created, summary.updated), (0, 1));

        let book = SqliteRepo::get_book_by_code(&conn, "B").unwrap().unwrap();
        assert_eq!(book.name, "New");
    }
}
