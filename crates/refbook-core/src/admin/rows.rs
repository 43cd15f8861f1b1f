//! Field access for rows shown in admin views

use crate::model::{ReferenceBookElement, ReferenceBookVersion, VersionWithBook};
use crate::resolver::AnnotatedBook;

use super::site::ModelKind;

/// A row that can be displayed by an admin list or inline table
pub trait AdminRow {
    /// Model the row belongs to (used for change links)
    fn kind(&self) -> ModelKind;

    /// Primary key of the row
    fn pk(&self) -> i64;

    /// Display value of a field; `None` renders as the column's empty value
    fn cell(&self, field: &str) -> Option<String>;
}

impl AdminRow for AnnotatedBook {
    fn kind(&self) -> ModelKind {
        ModelKind::Book
    }

    fn pk(&self) -> i64 {
        self.book.id
    }

    fn cell(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.book.id.to_string()),
            "code" => Some(self.book.code.clone()),
            "name" => Some(self.book.name.clone()),
            "description" => self.book.description.clone(),
            "current_version" => self.current.as_ref().map(|c| c.version.clone()),
            "version_date" => self.current.as_ref().map(|c| c.date.to_string()),
            _ => None,
        }
    }
}

impl AdminRow for ReferenceBookVersion {
    fn kind(&self) -> ModelKind {
        ModelKind::Version
    }

    fn pk(&self) -> i64 {
        self.id
    }

    fn cell(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "version" => Some(self.version.clone()),
            "date" => Some(self.date.to_string()),
            _ => None,
        }
    }
}

impl AdminRow for VersionWithBook {
    fn kind(&self) -> ModelKind {
        ModelKind::Version
    }

    fn pk(&self) -> i64 {
        self.version.id
    }

    fn cell(&self, field: &str) -> Option<String> {
        match field {
            "ref_book_code" => Some(self.book_code.clone()),
            "ref_book_name" => Some(self.book_name.clone()),
            other => self.version.cell(other),
        }
    }
}

impl AdminRow for ReferenceBookElement {
    fn kind(&self) -> ModelKind {
        ModelKind::Element
    }

    fn pk(&self) -> i64 {
        self.id
    }

    fn cell(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "code" => Some(self.code.clone()),
            "value" => Some(self.value.clone()),
            _ => None,
        }
    }
}
