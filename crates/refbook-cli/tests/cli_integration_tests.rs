//! CLI integration tests
//!
//! Run the `refbook` binary against a scratch catalog and check its output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("refbook-store")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn refbook(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_refbook"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn seeded() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("catalog.db");
    let output = refbook(&db, &["seed", "import", fixture("seed_minimal.yaml").to_str().unwrap()]);
    assert!(
        output.status.success(),
        "seed import failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    (temp_dir, db)
}

#[test]
fn test_seed_import_reports_counts() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("nested").join("catalog.db");
    let output = refbook(&db, &["seed", "import", fixture("seed_catalog.yaml").to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Imported 3 books, 3 versions, 6 elements"));
    assert!(db.exists());
}

#[test]
fn test_resolve_scenario_dates() {
    let (_tmp, db) = seeded();

    let out = refbook(&db, &["resolve", "1", "--date", "2023-08-15"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "v2\t2023-06-01");

    let out = refbook(&db, &["resolve", "1", "--date", "2022-01-01"]);
    assert_eq!(stdout(&out).trim(), "No current version");

    let out = refbook(&db, &["resolve", "1", "--date", "2024-06-01"]);
    assert_eq!(stdout(&out).trim(), "v3\t2024-01-01");
}

#[test]
fn test_resolve_unknown_book_prints_placeholder() {
    let (_tmp, db) = seeded();
    let out = refbook(&db, &["resolve", "999"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "No current version");
}

#[test]
fn test_book_list_renders_current_version_columns() {
    let (_tmp, db) = seeded();
    let out = refbook(&db, &["book", "create", "--code", "E", "--name", "Empty"]);
    assert!(out.status.success());

    let out = refbook(&db, &["book", "list", "--date", "2023-08-15"]);
    let text = stdout(&out);
    assert!(text.contains("| Current version | Version effective date |"));
    assert!(text.contains("| v2 | 2023-06-01 |"));
    assert!(text.contains("No current version"));
}

#[test]
fn test_book_show_json() {
    let (_tmp, db) = seeded();
    let out = refbook(&db, &["book", "show", "1", "--date", "2024-06-01", "--json"]);
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["book"]["code"], "B");
    assert_eq!(value["current"]["version"], "v3");
    assert_eq!(value["versions"].as_array().unwrap().len(), 3);
}

#[test]
fn test_invalid_date_fails() {
    let (_tmp, db) = seeded();
    let out = refbook(&db, &["resolve", "1", "--date", "2023-02-30"]);
    assert!(!out.status.success());
    let out = refbook(&db, &["resolve", "1", "--date=+10000-01-01"]);
    assert!(!out.status.success());
}

#[test]
fn test_version_list_with_huge_limit() {
    let (_tmp, db) = seeded();
    let limit = usize::MAX.to_string();
    let out = refbook(&db, &["version", "list", "--limit", &limit]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("v3"));
}

#[test]
fn test_book_delete_then_show_fails() {
    let (_tmp, db) = seeded();
    assert!(refbook(&db, &["book", "delete", "1"]).status.success());

    let out = refbook(&db, &["book", "show", "1"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("ERR_NOT_FOUND"));
}

#[test]
fn test_version_and_element_create() {
    let (_tmp, db) = seeded();
    let out = refbook(
        &db,
        &["version", "create", "--book", "1", "--version", "v4", "--date", "2025-01-01"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("(v4, effective 2025-01-01)"));

    let out = refbook(&db, &["resolve", "1", "--date", "2025-02-01"]);
    assert_eq!(stdout(&out).trim(), "v4\t2025-01-01");
}
