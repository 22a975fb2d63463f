//! # Error Types
//!
//! Domain-specific error types for fixquote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fixquote-core errors (this file)                                       │
//! │  ├── CoreError        - Selection / work-order rule violations          │
//! │  └── ValidationError  - Manual-entry admission failures                 │
//! │                                                                         │
//! │  quote-cli errors (separate crate)                                      │
//! │  └── CliError         - File, parsing and settings failures             │
//! │                                                                         │
//! │  NOT errors: combo rejection, negative profit. Those are values.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by selection and work-order operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A selection line (part line, manual entry) does not exist.
    ///
    /// ## When This Occurs
    /// - Removing a line twice
    /// - Toggling the supplier flag of a line from a stale view
    #[error("Selection line not found: {0}")]
    LineNotFound(String),

    /// `activate_combo` was called without a held suggestion.
    #[error("No combo suggestion to apply")]
    NoComboHeld,

    /// A saved draft could not be read back.
    #[error("Invalid draft: {0}")]
    InvalidDraft(String),

    /// A work order needs at least one catalog service.
    #[error("Work order needs at least one catalog service")]
    NothingToSave,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the admission boundary (manual entries, typed amounts) so that
/// invalid data never reaches a `Selection`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::LineNotFound("part_1".to_string());
        assert_eq!(err.to_string(), "Selection line not found: part_1");
        assert_eq!(
            CoreError::NothingToSave.to_string(),
            "Work order needs at least one catalog service"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::NotAllowed {
            field: "margin_percent".to_string(),
            allowed: vec!["30".to_string(), "40".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "margin_percent must be one of: [\"30\", \"40\"]"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "cost".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
