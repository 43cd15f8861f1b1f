//! Seed parser with validation
//!
//! Parses YAML and checks schema version, field validity and uniqueness of
//! book codes, version labels (per book) and element codes (per version).

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, seed_validation, Result};
use crate::seed::format_v0::SeedV0;
use refbook_core::ops::validation::{
    validate_code, validate_date, validate_name, validate_value, validate_version_label,
};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a seed file from a path
pub fn parse_seed_file(path: &Path) -> Result<SeedV0> {
    let content = fs::read_to_string(path).map_err(|e| io_error("seed_read", e))?;
    parse_seed_str(&content)
}

/// Parse a seed from a string
pub fn parse_seed_str(content: &str) -> Result<SeedV0> {
    let seed: SeedV0 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_seed(&seed)?;

    Ok(seed)
}

fn validate_seed(seed: &SeedV0) -> Result<()> {
    if seed.schema_version != 0 {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            seed.schema_version
        )));
    }

    let mut book_codes = HashSet::new();
    for book in &seed.books {
        let code = validate_code(&book.code).map_err(|e| seed_validation(&e.to_string()))?;
        validate_name(&book.name)
            .map_err(|e| seed_validation(&format!("Book {}: {}", code, e)))?;
        if !book_codes.insert(code.clone()) {
            return Err(seed_validation(&format!("Duplicate book code {}", code)));
        }

        let mut labels = HashSet::new();
        for version in &book.versions {
            let label = validate_version_label(&version.version)
                .map_err(|e| seed_validation(&format!("Book {}: {}", code, e)))?;
            validate_date(version.date).map_err(|e| {
                seed_validation(&format!("Book {} version {}: {}", code, label, e))
            })?;
            if !labels.insert(label.clone()) {
                return Err(seed_validation(&format!(
                    "Duplicate version {} in book {}",
                    label, code
                )));
            }

            let mut element_codes = HashSet::new();
            for element in &version.elements {
                let element_code = validate_code(&element.code).map_err(|e| {
                    seed_validation(&format!("Book {} version {}: {}", code, label, e))
                })?;
                validate_value(&element.value).map_err(|e| {
                    seed_validation(&format!("Book {} version {}: {}", code, label, e))
                })?;
                if !element_codes.insert(element_code.clone()) {
                    return Err(seed_validation(&format!(
                        "Duplicate element {} in book {} version {}",
                        element_code, code, label
                    )));
                }
            }
        }
    }

    Ok(())
}
