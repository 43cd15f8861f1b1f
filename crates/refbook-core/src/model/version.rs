use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{RefBookError, Result};

/// A dated snapshot of a reference book
///
/// The version is in effect from `date` until a later-dated version of the
/// same book supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceBookVersion {
    pub id: i64,

    /// Owning book
    pub ref_book_id: i64,

    /// Version label, unique within the book (e.g. `"1.0"`)
    pub version: String,

    /// Effective date
    pub date: NaiveDate,
}

impl ReferenceBookVersion {
    pub fn new(id: i64, ref_book_id: i64, version: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            ref_book_id,
            version: version.into(),
            date,
        }
    }

    /// Whether this version has taken effect on `reference_date`
    pub fn is_effective_on(&self, reference_date: NaiveDate) -> bool {
        self.date <= reference_date
    }

    /// Ordering key used for "latest" selection: date, then id
    pub fn recency_key(&self) -> (NaiveDate, i64) {
        (self.date, self.id)
    }
}

/// A version row joined with the code and name of its owning book
///
/// This is the row shape of the version list view; the store fills it from a
/// single join rather than one book lookup per version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionWithBook {
    pub version: ReferenceBookVersion,
    pub book_code: String,
    pub book_name: String,
}

/// Earliest and latest years a stored date may carry
///
/// Dates are persisted as `YYYY-MM-DD` text and compared lexically, which
/// only orders correctly for four-digit, unsigned years.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Check that `date` falls within `MIN_YEAR..=MAX_YEAR`
///
/// # Errors
///
/// Returns `InvalidDate` for signed or five-digit years.
pub fn check_date_range(date: NaiveDate) -> Result<NaiveDate> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(RefBookError::InvalidDate {
            value: date.to_string(),
        })
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form
///
/// # Errors
///
/// Returns `InvalidDate` if the string is not a valid ISO calendar date or
/// its year is outside `MIN_YEAR..=MAX_YEAR`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        RefBookError::InvalidDate {
            value: value.to_string(),
        }
    })?;
    check_date_range(date).map_err(|_| RefBookError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_effective_on_boundary() {
        let v = ReferenceBookVersion::new(1, 1, "v1", d("2023-06-01"));
        assert!(v.is_effective_on(d("2023-06-01")));
        assert!(v.is_effective_on(d("2023-06-02")));
        assert!(!v.is_effective_on(d("2023-05-31")));
    }

    #[test]
    fn test_recency_key_breaks_ties_by_id() {
        let a = ReferenceBookVersion::new(1, 1, "a", d("2024-01-01"));
        let b = ReferenceBookVersion::new(2, 1, "b", d("2024-01-01"));
        assert!(b.recency_key() > a.recency_key());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), d("2024-02-29"));
    }

    #[test]
    fn test_parse_date_rejects_years_outside_four_digits() {
        assert!(matches!(
            parse_date("+10000-01-01"),
            Err(RefBookError::InvalidDate { .. })
        ));
        assert!(parse_date("-0001-12-31").is_err());
        assert!(parse_date("0000-06-01").is_err());
        assert_eq!(parse_date("9999-12-31").unwrap(), d("9999-12-31"));
        assert_eq!(parse_date("0001-01-01").unwrap(), d("0001-01-01"));
    }

    #[test]
    fn test_check_date_range() {
        let far = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
        assert!(check_date_range(far).is_err());
        assert!(check_date_range(d("2024-06-01")).is_ok());
    }
}
