//! Reference book store - SQLite persistence
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - Repository CRUD for books, versions and elements
//! - Current-version resolution as a correlated subquery (single and batch)
//! - Hydration of the catalog into the in-memory `Store`
//! - YAML seed import

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;

pub use errors::Result;
