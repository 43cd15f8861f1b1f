//! Reference book catalog - domain kernel
//!
//! This crate provides the data model and pure logic of the catalog:
//! - ReferenceBook / ReferenceBookVersion / ReferenceBookElement models
//! - In-memory `Store` with validated CRUD operations and cascade delete
//! - Current-version resolution (latest version effective on a date)
//! - Admin view registry and Markdown rendering of list/detail views
//! - Structured error and logging facilities shared by the other crates

pub mod admin;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod resolver;

pub use errors::{ExError, ExErrorKind, RefBookError, Result};
pub use model::{ReferenceBook, ReferenceBookElement, ReferenceBookVersion};
pub use ops::Store;
pub use resolver::{AnnotatedBook, CurrentVersion};
