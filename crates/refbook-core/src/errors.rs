use refbook_core_types::RequestId;
use thiserror::Error;

/// Result type alias using RefBookError
pub type Result<T> = std::result::Result<T, RefBookError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (CLI, tests, any future
/// HTTP layer) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,
    ConstraintViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus optional
/// context for debugging. Store and engine layers return this type directly;
/// the in-memory kernel returns [`RefBookError`] which converts into it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by the in-memory catalog operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefBookError {
    /// Reference book not found in store
    #[error("Reference book not found: {book_id}")]
    BookNotFound { book_id: i64 },

    /// Version not found in store
    #[error("Reference book version not found: {version_id}")]
    VersionNotFound { version_id: i64 },

    /// Element not found in store
    #[error("Reference book element not found: {element_id}")]
    ElementNotFound { element_id: i64 },

    /// Book or element code is empty or malformed
    #[error("Invalid code: {reason}")]
    InvalidCode { reason: String },

    /// Book name is empty
    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    /// Version label is empty
    #[error("Invalid version label: {reason}")]
    InvalidVersionLabel { reason: String },

    /// Element value is malformed
    #[error("Invalid value: {reason}")]
    InvalidValue { reason: String },

    /// A date string could not be parsed as YYYY-MM-DD
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Another book already uses this code
    #[error("Reference book code already exists: {code}")]
    DuplicateBookCode { code: String },

    /// The book already has a version with this label
    #[error("Version '{version}' already exists in reference book {book_id}")]
    DuplicateVersionLabel { book_id: i64, version: String },

    /// The version already has an element with this code
    #[error("Element '{code}' already exists in version {version_id}")]
    DuplicateElementCode { version_id: i64, code: String },

    /// An admin view for this model is already registered
    #[error("Admin view already registered for model: {model}")]
    AlreadyRegistered { model: String },
}

impl From<RefBookError> for ExError {
    fn from(err: RefBookError) -> Self {
        let message = err.to_string();
        match err {
            RefBookError::BookNotFound { book_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(book_id)
                .with_message(message),

            RefBookError::VersionNotFound { version_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(version_id)
                .with_message(message),

            RefBookError::ElementNotFound { element_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(element_id)
                .with_message(message),

            RefBookError::InvalidCode { .. }
            | RefBookError::InvalidName { .. }
            | RefBookError::InvalidVersionLabel { .. }
            | RefBookError::InvalidValue { .. }
            | RefBookError::InvalidDate { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            RefBookError::DuplicateBookCode { code } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(code)
                .with_message(message),

            RefBookError::DuplicateVersionLabel { book_id, .. } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(book_id)
                    .with_message(message)
            }

            RefBookError::DuplicateElementCode { version_id, .. } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(version_id)
                    .with_message(message)
            }

            RefBookError::AlreadyRegistered { model } => ExError::new(ExErrorKind::AlreadyExists)
                .with_op("admin_register")
                .with_entity_id(model)
                .with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_op_and_entity() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("book_get")
            .with_entity_id(7)
            .with_message("missing");
        let text = err.to_string();
        assert_eq!(
            text,
            "[ERR_NOT_FOUND] in operation 'book_get': missing (entity_id: 7)"
        );
    }

    #[test]
    fn test_request_id_context() {
        let rid = RequestId::from_string("req-9".to_string());
        let err = ExError::new(ExErrorKind::Internal).with_request_id(rid.clone());
        assert_eq!(err.request_id(), Some(&rid));
    }

    #[test]
    fn test_invalid_date_is_invalid_input() {
        let err: ExError = RefBookError::InvalidDate {
            value: "2024-13-01".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(err.message().contains("2024-13-01"));
    }
}
