//! Seed digest canonicalization
//!
//! Computes stable SHA256 digests of seeds. Books are ordered by code,
//! versions by label and elements by code, so reordering a seed file or
//! reformatting its YAML keeps the digest.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::seed::format_v0::SeedV0;
use refbook_core::errors::{ExError, ExErrorKind};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize)]
struct CanonicalSeed {
    schema_version: u32,
    books: Vec<CanonicalBook>,
}

#[derive(Debug, Clone, Serialize)]
struct CanonicalBook {
    code: String,
    name: String,
    description: Option<String>,
    versions: Vec<CanonicalVersion>,
}

#[derive(Debug, Clone, Serialize)]
struct CanonicalVersion {
    version: String,
    date: String,
    elements: Vec<(String, String)>,
}

fn canonicalize_seed(seed: &SeedV0) -> CanonicalSeed {
    let mut books: Vec<CanonicalBook> = seed
        .books
        .iter()
        .map(|b| {
            let mut versions: Vec<CanonicalVersion> = b
                .versions
                .iter()
                .map(|v| {
                    let mut elements: Vec<(String, String)> = v
                        .elements
                        .iter()
                        .map(|e| (e.code.trim().to_string(), e.value.clone()))
                        .collect();
                    elements.sort();
                    CanonicalVersion {
                        version: v.version.trim().to_string(),
                        date: v.date.format("%Y-%m-%d").to_string(),
                        elements,
                    }
                })
                .collect();
            versions.sort_by(|a, b| a.version.cmp(&b.version));
            CanonicalBook {
                code: b.code.trim().to_string(),
                name: b.name.trim().to_string(),
                description: b.description.as_deref().map(str::trim).map(String::from),
                versions,
            }
        })
        .collect();
    books.sort_by(|a, b| a.code.cmp(&b.code));

    CanonicalSeed {
        schema_version: seed.schema_version,
        books,
    }
}

/// SHA256 hex digest of the canonical seed
///
/// # Errors
///
/// `Serialization` if the canonical form cannot be encoded as JSON.
pub fn compute_seed_digest(seed: &SeedV0) -> Result<String> {
    let json = serde_json::to_string(&canonicalize_seed(seed)).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("seed_digest")
            .with_message(e.to_string())
    })?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::parser::parse_seed_str;

    #[test]
    fn test_seed_digest_stable() {
        let yaml = r#"
schema_version: 0
books:
  - code: B
    name: Book B
    versions:
      - { version: v1, date: 2023-01-01 }
"#;
        let d1 = compute_seed_digest(&parse_seed_str(yaml).unwrap()).unwrap();
        let d2 = compute_seed_digest(&parse_seed_str(yaml).unwrap()).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
    }

    #[test]
    fn test_seed_digest_order_independent() {
        let a = r#"
schema_version: 0
books:
  - { code: A, name: First }
  - { code: B, name: Second }
"#;
        let b = r#"
schema_version: 0
books:
  - code: B
    name: Second
  - code: A
    name: First
"#;
        assert_eq!(
            compute_seed_digest(&parse_seed_str(a).unwrap()).unwrap(),
            compute_seed_digest(&parse_seed_str(b).unwrap()).unwrap()
        );
    }

    #[test]
    fn test_seed_digest_changes_with_content() {
        let a = "schema_version: 0\nbooks:\n  - { code: A, name: First }\n";
        let b = "schema_version: 0\nbooks:\n  - { code: A, name: Renamed }\n";
        assert_ne!(
            compute_seed_digest(&parse_seed_str(a).unwrap()).unwrap(),
            compute_seed_digest(&parse_seed_str(b).unwrap()).unwrap()
        );
    }
}
