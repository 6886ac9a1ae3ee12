//! Index error types
//!
//! Error codes:
//! - INDEX_UNKNOWN_TYPE (CONFIG)
//! - INDEX_DUPLICATE_FIELD (CONFIG)
//! - INDEX_INVALID_CONFIG (CONFIG)
//! - INDEX_INVALID_VALUE (VALUE)
//! - INDEX_MISSING_ENTITY_ID (VALUE)
//!
//! Unsupported query shapes are never errors: they surface as
//! `CandidateResult::Unsupported` so callers can fall back to a full scan.

use std::fmt;

use thiserror::Error;

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while building an index manager
    Config,
    /// Raised from `add`/`remove` for a value the index cannot hold
    Value,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "CONFIG"),
            ErrorKind::Value => write!(f, "VALUE"),
        }
    }
}

/// Index error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Index definition names a type that does not exist
    #[error("unknown index type `{index_type}` for field `{field}`")]
    UnknownIndexType { field: String, index_type: String },

    /// Two index definitions share a field name
    #[error("duplicate index definition for field `{field}`")]
    DuplicateField { field: String },

    /// Configuration document could not be interpreted
    #[error("invalid index configuration: {0}")]
    InvalidConfig(String),

    /// A value cannot be stored in the field's index
    #[error("invalid value for field `{field}`: expected {expected}, found {found}")]
    InvalidValue {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// The entity has no usable identifier
    #[error("entity has no string or integer `{id_field}`")]
    MissingEntityId { id_field: String },
}

impl IndexError {
    /// Create an invalid value error, rendering the offending value compactly
    pub fn invalid_value(
        field: impl Into<String>,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        let mut rendered = found.to_string();
        if rendered.len() > 64 {
            let cut = (0..=61).rev().find(|i| rendered.is_char_boundary(*i)).unwrap_or(0);
            rendered.truncate(cut);
            rendered.push_str("...");
        }
        IndexError::InvalidValue {
            field: field.into(),
            expected,
            found: rendered,
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::UnknownIndexType { .. } => "INDEX_UNKNOWN_TYPE",
            IndexError::DuplicateField { .. } => "INDEX_DUPLICATE_FIELD",
            IndexError::InvalidConfig(_) => "INDEX_INVALID_CONFIG",
            IndexError::InvalidValue { .. } => "INDEX_INVALID_VALUE",
            IndexError::MissingEntityId { .. } => "INDEX_MISSING_ENTITY_ID",
        }
    }

    /// Returns the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            IndexError::UnknownIndexType { .. }
            | IndexError::DuplicateField { .. }
            | IndexError::InvalidConfig(_) => ErrorKind::Config,
            IndexError::InvalidValue { .. } | IndexError::MissingEntityId { .. } => {
                ErrorKind::Value
            }
        }
    }

    /// Returns whether this error was raised by configuration
    pub fn is_config(&self) -> bool {
        self.kind() == ErrorKind::Config
    }
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
