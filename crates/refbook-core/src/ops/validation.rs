//! Field validation shared by the CRUD operations and the seed parser

use chrono::NaiveDate;

use crate::errors::{RefBookError, Result};
use crate::model::check_date_range;

pub const MAX_CODE_LEN: usize = 100;
pub const MAX_NAME_LEN: usize = 300;
pub const MAX_VERSION_LEN: usize = 50;
pub const MAX_VALUE_LEN: usize = 300;

/// Trim a book or element code and check it is usable
///
/// # Errors
///
/// Returns `InvalidCode` for empty, too long or whitespace-containing codes.
pub fn validate_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.is_empty() {
        return Err(RefBookError::InvalidCode {
            reason: "Code cannot be empty or whitespace-only".to_string(),
        });
    }
    if code.chars().count() > MAX_CODE_LEN {
        return Err(RefBookError::InvalidCode {
            reason: format!("Code exceeds {} characters", MAX_CODE_LEN),
        });
    }
    if code.chars().any(char::is_whitespace) {
        return Err(RefBookError::InvalidCode {
            reason: format!("Code '{}' must not contain whitespace", code),
        });
    }
    Ok(code.to_string())
}

/// # Errors
///
/// Returns `InvalidName` for empty or too long names.
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RefBookError::InvalidName {
            reason: "Name cannot be empty or whitespace-only".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(RefBookError::InvalidName {
            reason: format!("Name exceeds {} characters", MAX_NAME_LEN),
        });
    }
    Ok(name.to_string())
}

/// # Errors
///
/// Returns `InvalidVersionLabel` for empty or too long labels.
pub fn validate_version_label(version: &str) -> Result<String> {
    let version = version.trim();
    if version.is_empty() {
        return Err(RefBookError::InvalidVersionLabel {
            reason: "Version label cannot be empty or whitespace-only".to_string(),
        });
    }
    if version.chars().count() > MAX_VERSION_LEN {
        return Err(RefBookError::InvalidVersionLabel {
            reason: format!("Version label exceeds {} characters", MAX_VERSION_LEN),
        });
    }
    Ok(version.to_string())
}

/// Element values may be empty but are length-limited
///
/// # Errors
///
/// Returns `InvalidValue` if the value is too long.
pub fn validate_value(value: &str) -> Result<String> {
    if value.chars().count() > MAX_VALUE_LEN {
        return Err(RefBookError::InvalidValue {
            reason: format!("Element value exceeds {} characters", MAX_VALUE_LEN),
        });
    }
    Ok(value.to_string())
}

/// # Errors
///
/// Returns `InvalidDate` for years outside `0001..=9999`.
pub fn validate_date(date: NaiveDate) -> Result<NaiveDate> {
    check_date_range(date)
}

/// Normalise an optional description: blank becomes `None`
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
