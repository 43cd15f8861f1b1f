//! Current-version resolution
//!
//! The current version of a book on a reference date is the version with the
//! greatest effective date not after that date. Versions sharing that date are
//! ordered by id and the highest id wins, matching the SQL form
//! `ORDER BY date DESC, id DESC LIMIT 1` used by the store.

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{ReferenceBook, ReferenceBookVersion};
use crate::ops::Store;

/// The version in effect for a book on some reference date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentVersion {
    pub version_id: i64,
    pub version: String,
    pub date: NaiveDate,
}

impl From<&ReferenceBookVersion> for CurrentVersion {
    fn from(v: &ReferenceBookVersion) -> Self {
        Self {
            version_id: v.id,
            version: v.version.clone(),
            date: v.date,
        }
    }
}

/// A book row annotated with its current version (the book list view row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedBook {
    pub book: ReferenceBook,
    pub current: Option<CurrentVersion>,
}

/// The caller's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Pick the current version among `versions` for `reference_date`
pub fn select_current<'a, I>(versions: I, reference_date: NaiveDate) -> Option<&'a ReferenceBookVersion>
where
    I: IntoIterator<Item = &'a ReferenceBookVersion>,
{
    versions
        .into_iter()
        .filter(|v| v.is_effective_on(reference_date))
        .max_by_key(|v| v.recency_key())
}

/// Resolve the current version of one book
///
/// An unknown book id resolves to `None`, same as a book without effective
/// versions. `reference_date` defaults to [`today`].
pub fn resolve_current_version(
    store: &Store,
    book_id: i64,
    reference_date: Option<NaiveDate>,
) -> Option<CurrentVersion> {
    let reference_date = reference_date.unwrap_or_else(today);
    select_current(store.versions_of(book_id), reference_date).map(CurrentVersion::from)
}

/// Resolve current versions for many books in a single pass over the versions
///
/// Every requested id appears in the result; ids without a current version
/// (including unknown ids) map to `None`.
pub fn resolve_current_versions(
    store: &Store,
    book_ids: &[i64],
    reference_date: NaiveDate,
) -> BTreeMap<i64, Option<CurrentVersion>> {
    let mut best: HashMap<i64, &ReferenceBookVersion> =
        HashMap::with_capacity(book_ids.len());
    let wanted: std::collections::HashSet<i64> = book_ids.iter().copied().collect();

    for version in store.all_versions() {
        if !wanted.contains(&version.ref_book_id) || !version.is_effective_on(reference_date) {
            continue;
        }
        best.entry(version.ref_book_id)
            .and_modify(|current| {
                if version.recency_key() > current.recency_key() {
                    *current = version;
                }
            })
            .or_insert(version);
    }

    book_ids
        .iter()
        .map(|id| (*id, best.get(id).map(|v| CurrentVersion::from(*v))))
        .collect()
}

/// Every book in the store, ordered by id, annotated with its current version
pub fn annotate_books(store: &Store, reference_date: NaiveDate) -> Vec<AnnotatedBook> {
    let ids: Vec<i64> = store.list_books().iter().map(|b| b.id).collect();
    let mut resolved = resolve_current_versions(store, &ids, reference_date);
    store
        .list_books()
        .into_iter()
        .map(|book| AnnotatedBook {
            book: book.clone(),
            current: resolved.remove(&book.id).flatten(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceBook;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn scenario() -> Store {
        let mut store = Store::new();
        store.insert_book(ReferenceBook::new(1, "B", "Book B"));
        store.insert_version(ReferenceBookVersion::new(10, 1, "v1", d("2023-01-01")));
        store.insert_version(ReferenceBookVersion::new(11, 1, "v2", d("2023-06-01")));
        store.insert_version(ReferenceBookVersion::new(12, 1, "v3", d("2024-01-01")));
        store
    }

    #[test]
    fn test_scenario_dates() {
        let store = scenario();

        let mid = resolve_current_version(&store, 1, Some(d("2023-08-15"))).unwrap();
        assert_eq!((mid.version.as_str(), mid.date), ("v2", d("2023-06-01")));

        assert_eq!(resolve_current_version(&store, 1, Some(d("2022-01-01"))), None);

        let late = resolve_current_version(&store, 1, Some(d("2024-06-01"))).unwrap();
        assert_eq!((late.version.as_str(), late.date), ("v3", d("2024-01-01")));
    }

    #[test]
    fn test_on_effective_date_is_inclusive() {
        let store = scenario();
        let cv = resolve_current_version(&store, 1, Some(d("2023-06-01"))).unwrap();
        assert_eq!(cv.version, "v2");
    }

    #[test]
    fn test_unknown_book_is_none() {
        let store = scenario();
        assert_eq!(resolve_current_version(&store, 404, Some(d("2030-01-01"))), None);
    }

    #[test]
    fn test_book_without_versions_is_none() {
        let mut store = scenario();
        store.insert_book(ReferenceBook::new(2, "E", "Empty"));
        assert_eq!(resolve_current_version(&store, 2, Some(d("2030-01-01"))), None);
    }

    #[test]
    fn test_tie_on_date_picks_highest_id() {
        let mut store = scenario();
        store.insert_version(ReferenceBookVersion::new(20, 1, "v3-fix", d("2024-01-01")));
        let cv = resolve_current_version(&store, 1, Some(d("2024-06-01"))).unwrap();
        assert_eq!(cv.version_id, 20);
    }

    #[test]
    fn test_batch_includes_unknown_ids() {
        let store = scenario();
        let batch = resolve_current_versions(&store, &[1, 99], d("2023-08-15"));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[&1].as_ref().map(|c| c.version.as_str()), Some("v2"));
        assert_eq!(batch[&99], None);
    }

    #[test]
    fn test_annotate_books_orders_by_id() {
        let mut store = scenario();
        store.insert_book(ReferenceBook::new(0, "Z", "Zero"));
        let rows = annotate_books(&store, d("2023-08-15"));
        assert_eq!(rows[0].book.id, 0);
        assert!(rows[0].current.is_none());
        assert_eq!(rows[1].current.as_ref().unwrap().version, "v2");
    }
}
