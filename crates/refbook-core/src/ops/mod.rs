pub mod book_ops;
pub mod element_ops;
pub mod store;
pub mod validation;
pub mod version_ops;

pub use store::Store;
