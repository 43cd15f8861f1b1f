use serde::{Deserialize, Serialize};

/// A named, coded lookup catalog
///
/// Versions and elements are owned by the book but held separately in the
/// [`Store`](crate::ops::Store) and the database, keyed by `ref_book_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceBook {
    /// Datastore-assigned identifier
    pub id: i64,

    /// Short unique identifier (e.g. `"OKSM"`)
    pub code: String,

    /// Display name
    pub name: String,

    pub description: Option<String>,
}

impl ReferenceBook {
    pub fn new(id: i64, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
