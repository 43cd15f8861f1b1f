use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{RefBookError, Result};
use crate::model::{ReferenceBook, ReferenceBookElement, ReferenceBookVersion};

/// In-memory catalog store
///
/// Holds books, versions and elements keyed by id, plus ownership indexes so
/// that per-book and per-version lookups do not scan the whole catalog.
/// Not thread-safe; one store belongs to one request or one test.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) books: BTreeMap<i64, ReferenceBook>,
    pub(crate) versions: BTreeMap<i64, ReferenceBookVersion>,
    pub(crate) elements: BTreeMap<i64, ReferenceBookElement>,
    book_versions: BTreeMap<i64, BTreeSet<i64>>,
    version_elements: BTreeMap<i64, BTreeSet<i64>>,
    next_id: i64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id (shared sequence across entity kinds)
    pub(crate) fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn observe_id(&mut self, id: i64) {
        if id > self.next_id {
            self.next_id = id;
        }
    }

    /// # Errors
    ///
    /// Returns `BookNotFound` if no book has this id.
    pub fn get_book(&self, id: i64) -> Result<&ReferenceBook> {
        self.books
            .get(&id)
            .ok_or(RefBookError::BookNotFound { book_id: id })
    }

    /// # Errors
    ///
    /// Returns `BookNotFound` if no book has this id.
    pub fn get_book_mut(&mut self, id: i64) -> Result<&mut ReferenceBook> {
        self.books
            .get_mut(&id)
            .ok_or(RefBookError::BookNotFound { book_id: id })
    }

    /// # Errors
    ///
    /// Returns `VersionNotFound` if no version has this id.
    pub fn get_version(&self, id: i64) -> Result<&ReferenceBookVersion> {
        self.versions
            .get(&id)
            .ok_or(RefBookError::VersionNotFound { version_id: id })
    }

    /// # Errors
    ///
    /// Returns `VersionNotFound` if no version has this id.
    pub fn get_version_mut(&mut self, id: i64) -> Result<&mut ReferenceBookVersion> {
        self.versions
            .get_mut(&id)
            .ok_or(RefBookError::VersionNotFound { version_id: id })
    }

    /// # Errors
    ///
    /// Returns `ElementNotFound` if no element has this id.
    pub fn get_element(&self, id: i64) -> Result<&ReferenceBookElement> {
        self.elements
            .get(&id)
            .ok_or(RefBookError::ElementNotFound { element_id: id })
    }

    /// # Errors
    ///
    /// Returns `ElementNotFound` if no element has this id.
    pub fn get_element_mut(&mut self, id: i64) -> Result<&mut ReferenceBookElement> {
        self.elements
            .get_mut(&id)
            .ok_or(RefBookError::ElementNotFound { element_id: id })
    }

    /// Find a book by its unique code
    pub fn find_book_by_code(&self, code: &str) -> Option<&ReferenceBook> {
        self.books.values().find(|b| b.code == code)
    }

    /// All books ordered by id
    pub fn list_books(&self) -> Vec<&ReferenceBook> {
        self.books.values().collect()
    }

    /// Versions of one book, in index (id) order
    pub fn versions_of(&self, book_id: i64) -> impl Iterator<Item = &ReferenceBookVersion> {
        self.book_versions
            .get(&book_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.versions.get(id))
    }

    /// Elements of one version, in index (id) order
    pub fn elements_of(&self, version_id: i64) -> impl Iterator<Item = &ReferenceBookElement> {
        self.version_elements
            .get(&version_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.elements.get(id))
    }

    /// All versions ordered by id
    pub fn all_versions(&self) -> impl Iterator<Item = &ReferenceBookVersion> {
        self.versions.values()
    }

    /// Insert or replace a book, keeping its existing id
    ///
    /// Used by hydration and by the CRUD operations after validation.
    pub fn insert_book(&mut self, book: ReferenceBook) {
        self.observe_id(book.id);
        self.book_versions.entry(book.id).or_default();
        self.books.insert(book.id, book);
    }

    /// Insert or replace a version, keeping its existing id
    ///
    /// The owning book index is updated; moving a version between books is
    /// handled by removing it from the previous owner.
    pub fn insert_version(&mut self, version: ReferenceBookVersion) {
        self.observe_id(version.id);
        if let Some(previous) = self.versions.get(&version.id) {
            if previous.ref_book_id != version.ref_book_id {
                if let Some(ids) = self.book_versions.get_mut(&previous.ref_book_id) {
                    ids.remove(&version.id);
                }
            }
        }
        self.book_versions
            .entry(version.ref_book_id)
            .or_default()
            .insert(version.id);
        self.version_elements.entry(version.id).or_default();
        self.versions.insert(version.id, version);
    }

    /// Insert or replace an element, keeping its existing id
    pub fn insert_element(&mut self, element: ReferenceBookElement) {
        self.observe_id(element.id);
        if let Some(previous) = self.elements.get(&element.id) {
            if previous.version_id != element.version_id {
                if let Some(ids) = self.version_elements.get_mut(&previous.version_id) {
                    ids.remove(&element.id);
                }
            }
        }
        self.version_elements
            .entry(element.version_id)
            .or_default()
            .insert(element.id);
        self.elements.insert(element.id, element);
    }

    /// Remove an element; returns it if it existed
    pub(crate) fn remove_element(&mut self, id: i64) -> Option<ReferenceBookElement> {
        let element = self.elements.remove(&id)?;
        if let Some(ids) = self.version_elements.get_mut(&element.version_id) {
            ids.remove(&id);
        }
        Some(element)
    }

    /// Remove a version and all of its elements
    pub(crate) fn remove_version(&mut self, id: i64) -> Option<ReferenceBookVersion> {
        let version = self.versions.remove(&id)?;
        if let Some(ids) = self.book_versions.get_mut(&version.ref_book_id) {
            ids.remove(&id);
        }
        for element_id in self.version_elements.remove(&id).unwrap_or_default() {
            self.elements.remove(&element_id);
        }
        Some(version)
    }

    /// Remove a book together with its versions and their elements
    pub(crate) fn remove_book(&mut self, id: i64) -> Option<ReferenceBook> {
        let book = self.books.remove(&id)?;
        for version_id in self.book_versions.remove(&id).unwrap_or_default() {
            self.remove_version(version_id);
        }
        Some(book)
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}
