//! CLI-specific error types
//!
//! Every CLI error is fatal: it is reported once and the process exits non-zero.

use std::fmt;
use std::io;

use crate::index::IndexError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file unreadable or rejected
    ConfigError,
    /// Data file unreadable or malformed
    DataError,
    /// Predicate argument is not valid JSON
    PredicateError,
    /// Field has no number or date index
    NotOrderable,
    /// An entity was refused by an index
    IndexError,
    /// I/O error (stdout)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLI_CONFIG_ERROR",
            Self::DataError => "CLI_DATA_ERROR",
            Self::PredicateError => "CLI_PREDICATE_ERROR",
            Self::NotOrderable => "CLI_NOT_ORDERABLE",
            Self::IndexError => "CLI_INDEX_ERROR",
            Self::IoError => "CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn data_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DataError, msg)
    }

    pub fn predicate_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::PredicateError, msg)
    }

    pub fn not_orderable(field: &str) -> Self {
        Self::new(
            CliErrorCode::NotOrderable,
            format!("Field '{}' has no number or date index", field),
        )
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<IndexError> for CliError {
    fn from(e: IndexError) -> Self {
        if e.is_config() {
            Self::config_error(format!("{}: {}", e.code(), e))
        } else {
            Self::new(CliErrorCode::IndexError, format!("{}: {}", e.code(), e))
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_mapping() {
        let config: CliError = IndexError::DuplicateField {
            field: "a".to_string(),
        }
        .into();
        assert_eq!(config.code(), &CliErrorCode::ConfigError);
        assert!(config.message().starts_with("INDEX_DUPLICATE_FIELD"));

        let value: CliError = IndexError::MissingEntityId {
            id_field: "id".to_string(),
        }
        .into();
        assert_eq!(value.code_str(), "CLI_INDEX_ERROR");
    }

    #[test]
    fn test_display() {
        let err = CliError::not_orderable("genre");
        assert_eq!(
            err.to_string(),
            "CLI_NOT_ORDERABLE: Field 'genre' has no number or date index"
        );
    }
}
