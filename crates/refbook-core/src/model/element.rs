use serde::{Deserialize, Serialize};

/// One lookup row of a reference book version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceBookElement {
    pub id: i64,

    /// Owning version
    pub version_id: i64,

    /// Element code, unique within the version
    pub code: String,

    /// Element value shown to users
    pub value: String,
}

impl ReferenceBookElement {
    pub fn new(id: i64, version_id: i64, code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id,
            version_id,
            code: code.into(),
            value: value.into(),
        }
    }
}
