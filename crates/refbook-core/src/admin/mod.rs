//! Admin view registry and rendering
//!
//! Views are registered explicitly at startup through [`AdminSite`]; nothing
//! is registered as a side effect of loading a module.

pub mod column;
pub mod render;
pub mod rows;
pub mod site;

pub use column::{Column, EMPTY_CURRENT_VERSION};
pub use rows::AdminRow;
pub use site::{AdminSite, InlineAdmin, ModelAdmin, ModelKind};
