pub mod book;
pub mod element;
pub mod version;

pub use book::ReferenceBook;
pub use element::ReferenceBookElement;
pub use version::{check_date_range, parse_date, ReferenceBookVersion, VersionWithBook};
