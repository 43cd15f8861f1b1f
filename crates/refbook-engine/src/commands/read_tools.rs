//! Result types and pagination helpers for the read-only query surface.
//!
//! Plain data containers returned by `apply_engine_query`; no I/O.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::NaiveDate;
use refbook_core::errors::{ExError, ExErrorKind};
use refbook_core::model::{
    ReferenceBook, ReferenceBookElement, ReferenceBookVersion, VersionWithBook,
};
use refbook_core::resolver::{AnnotatedBook, CurrentVersion};
use serde::Serialize;

/// Default maximum items per paginated list query.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Upper bound on a caller-supplied limit.
pub const MAX_LIST_LIMIT: usize = 1000;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Options controlling a paginated list query.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Maximum number of items to return (defaults to `DEFAULT_LIST_LIMIT`,
    /// capped at `MAX_LIST_LIMIT`).
    pub limit: Option<usize>,
    /// Opaque cursor from a previous response (base64 of the last id).
    pub cursor: Option<String>,
    /// Substring matched against code and name, where the list supports it.
    pub search: Option<String>,
}

impl ListOptions {
    /// Effective limit; zero is treated as the default
    pub fn effective_limit(&self) -> usize {
        match self.limit {
            Some(0) | None => DEFAULT_LIST_LIMIT,
            Some(limit) => limit.min(MAX_LIST_LIMIT),
        }
    }

    /// Rows to fetch: one past the effective limit to detect `has_more`
    pub fn fetch_limit(&self) -> usize {
        self.effective_limit().saturating_add(1)
    }

    /// Decode the cursor into the id after which the next page starts
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the cursor was not produced by this engine.
    pub fn decode_cursor(&self) -> Result<Option<i64>, ExError> {
        let Some(cursor) = self.cursor.as_deref() else {
            return Ok(None);
        };
        let invalid = || {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("decode_cursor")
                .with_message(format!("Invalid cursor: {}", cursor))
        };
        let bytes = URL_SAFE_NO_PAD.decode(cursor).map_err(|_| invalid())?;
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;
        text.parse::<i64>().map(Some).map_err(|_| invalid())
    }
}

/// Encode an id as an opaque cursor
pub fn encode_cursor(id: i64) -> String {
    URL_SAFE_NO_PAD.encode(id.to_string())
}

/// A paginated page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` when this is the last page.
    pub cursor: Option<String>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Build a page from a raw over-fetched slice.
    ///
    /// `raw` should contain `limit + 1` items at most. If `raw.len() > limit`,
    /// the extra item is dropped and `has_more` is set to `true`.
    pub fn from_overshot(mut raw: Vec<T>, limit: usize, id_fn: impl Fn(&T) -> i64) -> Self {
        let has_more = raw.len() > limit;
        if has_more {
            raw.truncate(limit);
        }
        let cursor = if has_more {
            raw.last().map(|item| encode_cursor(id_fn(item)))
        } else {
            None
        };
        Page {
            items: raw,
            cursor,
            has_more,
        }
    }
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

/// Book list page, each row annotated with its current version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookListResult {
    pub reference_date: NaiveDate,
    pub page: Page<AnnotatedBook>,
}

/// Result of a `BookGet` query: the change view of one book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookGetResult {
    pub book: ReferenceBook,
    pub reference_date: NaiveDate,
    pub current: Option<CurrentVersion>,
    /// Inline versions, oldest first.
    pub versions: Vec<ReferenceBookVersion>,
}

/// Result of a `CurrentVersion` query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentVersionResult {
    pub book_id: i64,
    pub reference_date: NaiveDate,
    pub current: Option<CurrentVersion>,
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

/// Result of a `VersionGet` query: the change view of one version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionGetResult {
    pub version: VersionWithBook,
    /// Inline elements ordered by code.
    pub elements: Vec<ReferenceBookElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let opts = ListOptions {
            cursor: Some(encode_cursor(42)),
            ..Default::default()
        };
        assert_eq!(opts.decode_cursor().unwrap(), Some(42));
    }

    #[test]
    fn test_garbage_cursor_is_invalid_input() {
        let opts = ListOptions {
            cursor: Some("not a cursor!".to_string()),
            ..Default::default()
        };
        assert_eq!(
            opts.decode_cursor().unwrap_err().kind(),
            ExErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_from_overshot() {
        let page = Page::from_overshot(vec![1_i64, 2, 3], 2, |id| *id);
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_more);
        assert_eq!(page.cursor, Some(encode_cursor(2)));

        let last = Page::from_overshot(vec![3_i64], 2, |id| *id);
        assert!(!last.has_more);
        assert_eq!(last.cursor, None);
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(ListOptions::default().effective_limit(), DEFAULT_LIST_LIMIT);
        let opts = ListOptions {
            limit: Some(5),
            ..Default::default()
        };
        assert_eq!(opts.effective_limit(), 5);
        assert_eq!(opts.fetch_limit(), 6);
    }

    #[test]
    fn test_huge_limit_is_capped() {
        let opts = ListOptions {
            limit: Some(usize::MAX),
            ..Default::default()
        };
        assert_eq!(opts.effective_limit(), MAX_LIST_LIMIT);
        assert_eq!(opts.fetch_limit(), MAX_LIST_LIMIT + 1);
    }
}
