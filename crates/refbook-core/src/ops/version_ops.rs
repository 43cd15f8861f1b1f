use chrono::NaiveDate;

use super::store::Store;
use super::validation::{validate_date, validate_version_label};
use crate::errors::{RefBookError, Result};
use crate::model::ReferenceBookVersion;

/// Partial update of a version; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionUpdate {
    pub version: Option<String>,
    pub date: Option<NaiveDate>,
}

fn label_taken(store: &Store, book_id: i64, label: &str, except: Option<i64>) -> bool {
    store
        .versions_of(book_id)
        .any(|v| v.version == label && Some(v.id) != except)
}

/// Add a dated version to a book
///
/// Effective dates may repeat within a book; labels may not.
///
/// # Errors
/// * `BookNotFound` - If the owning book doesn't exist
/// * `InvalidVersionLabel` - If the label is empty
/// * `InvalidDate` - If the year is outside `0001..=9999`
/// * `DuplicateVersionLabel` - If the book already has this label
pub fn create_version(
    store: &mut Store,
    book_id: i64,
    version: &str,
    date: NaiveDate,
) -> Result<i64> {
    store.get_book(book_id)?;
    let version = validate_version_label(version)?;
    let date = validate_date(date)?;
    if label_taken(store, book_id, &version, None) {
        return Err(RefBookError::DuplicateVersionLabel { book_id, version });
    }

    let id = store.allocate_id();
    store.insert_version(ReferenceBookVersion::new(id, book_id, version, date));
    Ok(id)
}

/// # Errors
/// * `VersionNotFound` - If the version doesn't exist
pub fn read_version(store: &Store, id: i64) -> Result<&ReferenceBookVersion> {
    store.get_version(id)
}

/// # Errors
/// * `VersionNotFound` - If the version doesn't exist
/// * `InvalidVersionLabel` / `DuplicateVersionLabel` - If the new label is unusable
/// * `InvalidDate` - If the new date's year is outside `0001..=9999`
pub fn update_version(store: &mut Store, id: i64, update: VersionUpdate) -> Result<()> {
    let book_id = store.get_version(id)?.ref_book_id;
    let label = update
        .version
        .as_deref()
        .map(validate_version_label)
        .transpose()?;
    let date = update.date.map(validate_date).transpose()?;

    if let Some(ref label) = label {
        if label_taken(store, book_id, label, Some(id)) {
            return Err(RefBookError::DuplicateVersionLabel {
                book_id,
                version: label.clone(),
            });
        }
    }

    let version = store.get_version_mut(id)?;
    if let Some(label) = label {
        version.version = label;
    }
    if let Some(date) = date {
        version.date = date;
    }
    Ok(())
}

/// Delete a version and its elements
///
/// # Errors
/// * `VersionNotFound` - If the version doesn't exist
pub fn delete_version(store: &mut Store, id: i64) -> Result<ReferenceBookVersion> {
    store
        .remove_version(id)
        .ok_or(RefBookError::VersionNotFound { version_id: id })
}

/// Versions of a book ordered by effective date, then id
///
/// # Errors
/// * `BookNotFound` - If the book doesn't exist
pub fn list_versions_for_book(store: &Store, book_id: i64) -> Result<Vec<&ReferenceBookVersion>> {
    store.get_book(book_id)?;
    let mut versions: Vec<_> = store.versions_of(book_id).collect();
    versions.sort_by_key(|v| v.recency_key());
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::book_ops::create_book;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_create_requires_book() {
        let mut store = Store::new();
        assert_eq!(
            create_version(&mut store, 99, "v1", d(2024, 1, 1)),
            Err(RefBookError::BookNotFound { book_id: 99 })
        );
    }

    #[test]
    fn test_same_label_in_different_books_is_fine() {
        let mut store = Store::new();
        let a = create_book(&mut store, "A", "Alpha", None).unwrap();
        let b = create_book(&mut store, "B", "Beta", None).unwrap();
        create_version(&mut store, a, "1.0", d(2024, 1, 1)).unwrap();
        create_version(&mut store, b, "1.0", d(2024, 1, 1)).unwrap();
        assert!(create_version(&mut store, a, "1.0", d(2025, 1, 1)).is_err());
    }

    #[test]
    fn test_same_date_allowed() {
        let mut store = Store::new();
        let a = create_book(&mut store, "A", "Alpha", None).unwrap();
        create_version(&mut store, a, "1.0", d(2024, 1, 1)).unwrap();
        assert!(create_version(&mut store, a, "1.1", d(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_list_ordered_by_date() {
        let mut store = Store::new();
        let a = create_book(&mut store, "A", "Alpha", None).unwrap();
        create_version(&mut store, a, "late", d(2025, 1, 1)).unwrap();
        create_version(&mut store, a, "early", d(2023, 1, 1)).unwrap();
        let labels: Vec<_> = list_versions_for_book(&store, a)
            .unwrap()
            .iter()
            .map(|v| v.version.as_str())
            .collect();
        assert_eq!(labels, vec!["early", "late"]);
    }

    #[test]
    fn test_update_label_conflict() {
        let mut store = Store::new();
        let a = create_book(&mut store, "A", "Alpha", None).unwrap();
        create_version(&mut store, a, "1.0", d(2024, 1, 1)).unwrap();
        let v2 = create_version(&mut store, a, "2.0", d(2024, 6, 1)).unwrap();
        let result = update_version(
            &mut store,
            v2,
            VersionUpdate {
                version: Some("1.0".to_string()),
                date: None,
            },
        );
        assert!(matches!(
            result,
            Err(RefBookError::DuplicateVersionLabel { .. })
        ));
    }

    #[test]
    fn test_five_digit_year_rejected() {
        let mut store = Store::new();
        let a = create_book(&mut store, "A", "Alpha", None).unwrap();
        assert!(matches!(
            create_version(&mut store, a, "far", d(10_000, 1, 1)),
            Err(RefBookError::InvalidDate { .. })
        ));
        let v1 = create_version(&mut store, a, "1.0", d(2024, 1, 1)).unwrap();
        let result = update_version(
            &mut store,
            v1,
            VersionUpdate {
                version: None,
                date: Some(d(10_000, 1, 1)),
            },
        );
        assert!(matches!(result, Err(RefBookError::InvalidDate { .. })));
        assert_eq!(read_version(&store, v1).unwrap().date, d(2024, 1, 1));
    }
}
