//! Seed Format v0 schema
//!
//! ```yaml
//! schema_version: 0
//! books:
//!   - code: OKV
//!     name: Currencies
//!     description: ISO 4217
//!     versions:
//!       - version: "2024.1"
//!         date: 2024-01-01
//!         elements:
//!           - code: RUB
//!             value: Russian ruble
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level seed file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    #[serde(default)]
    pub books: Vec<SeedBook>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedBook {
    /// Book code, the import key for books
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub versions: Vec<SeedVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedVersion {
    /// Version label, the import key within a book
    pub version: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub elements: Vec<SeedElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedElement {
    pub code: String,

    /// Element value; numbers and booleans are kept as their text form
    #[serde(deserialize_with = "deserialize_value")]
    pub value: String,
}

/// Accept any YAML scalar for an element value
fn deserialize_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}
