//! Error types for recordbook.
//!
//! Store mutations, form submission, and configuration loading all report
//! failures through the single [`Error`] enum defined here.

use thiserror::Error;

use crate::record::RecordId;
use crate::validation::ValidationErrors;

/// The main error type for recordbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// A positional store operation was given an index outside `[0, len)`.
    #[error("index out of range: {index} (store holds {len} records)")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of records in the store.
        len: usize,
    },

    /// No record with the given id exists in the store.
    #[error("record {id} not found")]
    RecordNotFound {
        /// The missing record id.
        id: RecordId,
    },

    // === Interaction Errors ===
    /// A row was selected that is not on the current page.
    #[error("row {row} is not on the current page ({visible} rows shown)")]
    RowOutOfRange {
        /// The requested page-relative row.
        row: usize,
        /// Number of rows on the current page.
        visible: usize,
    },

    /// Form submission was blocked by invalid fields.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The form still holds its initial values.
    #[error("nothing to save: the form has not been changed")]
    FormUnchanged,

    /// Edit or delete was requested without a selected row.
    #[error("no row selected")]
    NoSelection,

    /// The action is not permitted in the current mode.
    #[error("cannot {action} while {mode}")]
    InvalidTransition {
        /// The mode the controller was in.
        mode: &'static str,
        /// The rejected action.
        action: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for recordbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Create an invalid transition error.
    #[must_use]
    pub fn invalid_transition(mode: &'static str, action: &'static str) -> Self {
        Self::InvalidTransition { mode, action }
    }

    /// Check if this error is a form validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The field errors carried by a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Field, FieldError};

    #[test]
    fn test_error_display() {
        let err = Error::NoSelection;
        assert_eq!(err.to_string(), "no row selected");

        let err = Error::FormUnchanged;
        assert!(err.to_string().starts_with("nothing to save"));
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = Error::IndexOutOfRange { index: 4, len: 2 };
        let msg = err.to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains("2 records"));
    }

    #[test]
    fn test_record_not_found_display() {
        let err = Error::RecordNotFound { id: RecordId::new(7) };
        assert_eq!(err.to_string(), "record #7 not found");
    }

    #[test]
    fn test_row_out_of_range_display() {
        let err = Error::RowOutOfRange { row: 9, visible: 5 };
        assert!(err.to_string().contains("5 rows shown"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = Error::invalid_transition("idle", "submit");
        assert_eq!(err.to_string(), "cannot submit while idle");
    }

    #[test]
    fn test_is_validation() {
        let mut errors = ValidationErrors::default();
        errors.push(Field::Keyword, FieldError::Required);
        let err: Error = errors.into();

        assert!(err.is_validation());
        assert!(!Error::NoSelection.is_validation());
        assert_eq!(err.validation_errors().map(ValidationErrors::len), Some(1));
        assert!(Error::FormUnchanged.validation_errors().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("stdin closed"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "page_size must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("page_size"));
    }
}
