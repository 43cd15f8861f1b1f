use chrono::NaiveDate;
use refbook_core::ops::{book_ops, version_ops};
use refbook_core::Store;

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Book "B" with versions v1 (2023-01-01), v2 (2023-06-01), v3 (2024-01-01)
#[allow(dead_code)]
pub fn store_with_book_b() -> (Store, i64) {
    let mut store = Store::new();
    let book = book_ops::create_book(&mut store, "B", "Book B", None).unwrap();
    for (label, d) in [("v1", "2023-01-01"), ("v2", "2023-06-01"), ("v3", "2024-01-01")] {
        version_ops::create_version(&mut store, book, label, date(d)).unwrap();
    }
    (store, book)
}
