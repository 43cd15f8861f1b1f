//! Reference book engine - orchestration layer
//!
//! Coordinates the core kernel (validation, resolution, admin rendering) with
//! the SQLite store. All reads go through `apply_engine_query`, all writes
//! through `apply_engine_command`.

pub mod commands;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
