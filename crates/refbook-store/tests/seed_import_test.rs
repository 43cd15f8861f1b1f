// Seed import: fixtures, idempotent re-import, hydration of the result

use chrono::NaiveDate;
use refbook_core::resolver;
use refbook_store::db::open_catalog_in_memory;
use refbook_store::repo::hydration::{load_book, load_catalog};
use refbook_store::repo::SqliteRepo;
use refbook_store::seed::import_seed;
use rusqlite::Connection;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn counts(conn: &Connection) -> (i64, i64, i64) {
    let count = |table: &str| -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    };
    (
        count("ref_books"),
        count("ref_book_versions"),
        count("ref_book_elements"),
    )
}

#[test]
fn test_import_catalog_fixture() {
    let mut conn = open_catalog_in_memory().unwrap();
    let summary = import_seed(&fixture("seed_catalog.yaml"), &mut conn).unwrap();

    assert_eq!((summary.books, summary.versions, summary.elements), (3, 3, 6));
    assert_eq!(counts(&conn), (3, 3, 6));

    let okv = SqliteRepo::get_book_by_code(&conn, "OKV").unwrap().unwrap();
    assert_eq!(okv.description.as_deref(), Some("ISO 4217 currency codes"));
}

#[test]
fn test_reimport_is_idempotent() {
    let mut conn = open_catalog_in_memory().unwrap();
    let first = import_seed(&fixture("seed_catalog.yaml"), &mut conn).unwrap();
    let before = counts(&conn);

    let second = import_seed(&fixture("seed_catalog.yaml"), &mut conn).unwrap();
    assert_eq!(counts(&conn), before);
    assert_eq!(first.seed_digest, second.seed_digest);
    assert_eq!((second.created, second.updated), (0, 0));

    let ledger: i64 = conn
        .query_row("SELECT COUNT(*) FROM seed_imports", [], |r| r.get(0))
        .unwrap();
    assert_eq!(ledger, 2);
}

#[test]
fn test_invalid_seed_leaves_database_untouched() {
    let mut conn = open_catalog_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(
        &path,
        "schema_version: 0\nbooks:\n  - { code: A, name: One }\n  - { code: A, name: Two }\n",
    )
    .unwrap();

    assert!(import_seed(&path, &mut conn).is_err());
    assert_eq!(counts(&conn), (0, 0, 0));
}

#[test]
fn test_hydrated_catalog_resolves_like_sql() {
    let mut conn = open_catalog_in_memory().unwrap();
    import_seed(&fixture("seed_catalog.yaml"), &mut conn).unwrap();
    let store = load_catalog(&conn).unwrap();

    assert_eq!(store.book_count(), 3);
    assert_eq!(store.element_count(), 6);

    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    for book in SqliteRepo::list_books(&conn).unwrap() {
        let sql = refbook_store::repo::resolve_current_version(&conn, book.id, date).unwrap();
        let memory = resolver::resolve_current_version(&store, book.id, Some(date));
        assert_eq!(sql, memory, "book {}", book.code);
    }
}

#[test]
fn test_load_single_book() {
    let mut conn = open_catalog_in_memory().unwrap();
    import_seed(&fixture("seed_minimal.yaml"), &mut conn).unwrap();
    let book = SqliteRepo::get_book_by_code(&conn, "B").unwrap().unwrap();

    let store = load_book(&conn, book.id).unwrap();
    assert_eq!(store.book_count(), 1);
    assert_eq!(store.version_count(), 3);
    assert_eq!(store.element_count(), 2);

    assert_eq!(load_book(&conn, 9999).unwrap().book_count(), 0);
}
