use super::store::Store;
use super::validation::{normalize_description, validate_code, validate_name};
use crate::errors::{RefBookError, Result};
use crate::model::ReferenceBook;

/// Partial update of a reference book; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
}

/// Create a new reference book
///
/// # Errors
/// * `InvalidCode` / `InvalidName` - If a field fails validation
/// * `DuplicateBookCode` - If another book already uses the code
pub fn create_book(
    store: &mut Store,
    code: &str,
    name: &str,
    description: Option<String>,
) -> Result<i64> {
    let code = validate_code(code)?;
    let name = validate_name(name)?;
    if store.find_book_by_code(&code).is_some() {
        return Err(RefBookError::DuplicateBookCode { code });
    }

    let id = store.allocate_id();
    let mut book = ReferenceBook::new(id, code, name);
    book.description = normalize_description(description);
    store.insert_book(book);
    Ok(id)
}

/// # Errors
/// * `BookNotFound` - If the book doesn't exist
pub fn read_book(store: &Store, id: i64) -> Result<&ReferenceBook> {
    store.get_book(id)
}

/// Apply a partial update to a book
///
/// # Errors
/// * `BookNotFound` - If the book doesn't exist
/// * `InvalidCode` / `InvalidName` - If a new value fails validation
/// * `DuplicateBookCode` - If the new code belongs to another book
pub fn update_book(store: &mut Store, id: i64, update: BookUpdate) -> Result<()> {
    store.get_book(id)?;

    let code = update.code.as_deref().map(validate_code).transpose()?;
    let name = update.name.as_deref().map(validate_name).transpose()?;

    if let Some(ref code) = code {
        if store
            .find_book_by_code(code)
            .is_some_and(|other| other.id != id)
        {
            return Err(RefBookError::DuplicateBookCode { code: code.clone() });
        }
    }

    let book = store.get_book_mut(id)?;
    if let Some(code) = code {
        book.code = code;
    }
    if let Some(name) = name {
        book.name = name;
    }
    if let Some(description) = update.description {
        book.description = normalize_description(description);
    }
    Ok(())
}

/// Delete a book with all of its versions and their elements
///
/// # Errors
/// * `BookNotFound` - If the book doesn't exist
pub fn delete_book(store: &mut Store, id: i64) -> Result<ReferenceBook> {
    store
        .remove_book(id)
        .ok_or(RefBookError::BookNotFound { book_id: id })
}

/// All books ordered by id
pub fn list_books(store: &Store) -> Vec<&ReferenceBook> {
    store.list_books()
}
