// Integration tests for the migration framework

use refbook_core::errors::ExErrorKind;
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();

    let result = refbook_store::migrations::apply_migrations(&mut conn);
    assert!(
        result.is_ok(),
        "Migrations should succeed: {:?}",
        result.err()
    );

    let tables = get_table_names(&conn);
    let expected_tables = [
        "schema_version",
        "ref_books",
        "ref_book_versions",
        "ref_book_elements",
        "seed_imports",
        "sqlite_sequence", // created by SQLite for AUTOINCREMENT columns
    ];
    assert_eq!(tables.len(), expected_tables.len(), "tables: {:?}", tables);
    for expected in &expected_tables {
        assert!(
            tables.contains(&expected.to_string()),
            "Missing table: {}",
            expected
        );
    }
}

#[test]
fn test_migrations_idempotent() {
    let mut conn = setup_test_db();
    refbook_store::migrations::apply_migrations(&mut conn).unwrap();
    refbook_store::migrations::apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count as usize, refbook_store::migrations::get_migrations().len());
}

#[test]
fn test_checksums_recorded() {
    let mut conn = setup_test_db();
    refbook_store::migrations::apply_migrations(&mut conn).unwrap();

    let mut stmt = conn
        .prepare("SELECT migration_id, checksum FROM schema_version ORDER BY migration_id")
        .unwrap();
    let rows: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(rows[0].0, "001_reference_books");
    for (id, checksum) in &rows {
        assert_eq!(checksum.len(), 64, "checksum of {}", id);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn test_edited_migration_is_rejected() {
    let mut conn = setup_test_db();
    refbook_store::migrations::apply_migrations(&mut conn).unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = ?1 WHERE migration_id = '002_current_version_index'",
        [refbook_store::migrations::compute_checksum("something else")],
    )
    .unwrap();

    let err = refbook_store::migrations::apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert!(err.message().contains("002_current_version_index"));
}

#[test]
fn test_current_version_index_exists() {
    let mut conn = setup_test_db();
    refbook_store::migrations::apply_migrations(&mut conn).unwrap();

    let exists: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_ref_book_versions_book_date'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}
