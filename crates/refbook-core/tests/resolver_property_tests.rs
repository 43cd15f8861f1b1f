use chrono::NaiveDate;
use proptest::prelude::*;
use refbook_core::model::{ReferenceBook, ReferenceBookVersion};
use refbook_core::resolver::{resolve_current_version, resolve_current_versions};
use refbook_core::Store;

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(offset)
}

/// (book index, day offset) pairs; version ids follow insertion order
fn build(books: usize, versions: &[(usize, i64)]) -> Store {
    let mut store = Store::new();
    for b in 0..books {
        store.insert_book(ReferenceBook::new(b as i64 + 1, format!("B{}", b), "book"));
    }
    for (i, (b, offset)) in versions.iter().enumerate() {
        store.insert_version(ReferenceBookVersion::new(
            1000 + i as i64,
            (*b % books) as i64 + 1,
            format!("v{}", i),
            day(*offset),
        ));
    }
    store
}

proptest! {
    #[test]
    fn current_version_is_latest_not_after_reference(
        versions in prop::collection::vec((0usize..4, 0i64..60), 0..30),
        reference in 0i64..60,
    ) {
        let store = build(4, &versions);
        let reference = day(reference);
        for book_id in 1..=4i64 {
            let resolved = resolve_current_version(&store, book_id, Some(reference));
            let candidates: Vec<_> = store
                .versions_of(book_id)
                .filter(|v| v.date <= reference)
                .collect();
            match resolved {
                None => prop_assert!(candidates.is_empty()),
                Some(cv) => {
                    prop_assert!(cv.date <= reference);
                    prop_assert!(candidates.iter().all(|v| (v.date, v.id) <= (cv.date, cv.version_id)));
                }
            }
        }
    }

    #[test]
    fn batch_equals_singles_in_any_order(
        versions in prop::collection::vec((0usize..5, 0i64..40), 0..40),
        reference in 0i64..40,
        order in Just(vec![5i64, 3, 1, 4, 2, 99]).prop_shuffle(),
    ) {
        let store = build(5, &versions);
        let reference = day(reference);
        let batch = resolve_current_versions(&store, &order, reference);
        for id in &order {
            prop_assert_eq!(&batch[id], &resolve_current_version(&store, *id, Some(reference)));
        }
    }
}
