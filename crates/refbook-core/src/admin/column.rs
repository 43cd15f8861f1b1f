/// Placeholder shown when a book has no version in effect
pub const EMPTY_CURRENT_VERSION: &str = "No current version";

/// Placeholder for any other missing value
pub const EMPTY_VALUE: &str = "-";

/// One column of a list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field name, resolved through [`AdminRow::cell`](super::AdminRow::cell)
    pub field: &'static str,
    /// Header text
    pub label: &'static str,
    /// Rendered when the row has no value for this field
    pub empty_value: &'static str,
    /// Whether the cell links to the row's change view
    pub link: bool,
}

impl Column {
    pub const fn new(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            label,
            empty_value: EMPTY_VALUE,
            link: false,
        }
    }

    pub const fn with_empty_value(mut self, empty_value: &'static str) -> Self {
        self.empty_value = empty_value;
        self
    }

    pub const fn linked(mut self) -> Self {
        self.link = true;
        self
    }
}
