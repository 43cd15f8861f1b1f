//! Repository layer over the SQLite schema
//!
//! Row-level CRUD lives in `sqlite_repo`; current-version resolution in SQL in
//! `current_version`; loading the whole catalog into the in-memory `Store` in
//! `hydration`.

pub mod current_version;
pub mod hydration;
pub mod sqlite_repo;

pub use current_version::{
    list_books_with_current_version, resolve_current_version, resolve_current_versions,
    BookListFilter,
};
pub use sqlite_repo::SqliteRepo;
