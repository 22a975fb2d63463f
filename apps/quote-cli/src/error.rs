//! # CLI Error Type
//!
//! Unified error type for the `fixquote` binary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  args / settings / input / core                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CliError ──► main() ──► stderr: "error[CODE]: message" ──► exit 1      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use fixquote_core::{CoreError, ValidationError};
use thiserror::Error;

/// Machine-readable error codes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad command-line usage
    Usage,

    /// File could not be read
    Io,

    /// Catalog or draft JSON is malformed
    InvalidInput,

    /// Settings file or environment is invalid
    InvalidSettings,

    /// Admission rule rejected a value
    ValidationError,

    /// Business rule violation from the engine
    BusinessLogic,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Usage => "USAGE",
            ErrorCode::Io => "IO_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InvalidSettings => "INVALID_SETTINGS",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
        }
    }
}

/// Errors raised by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Usage(_) => ErrorCode::Usage,
            CliError::Io { .. } => ErrorCode::Io,
            CliError::Json { .. } => ErrorCode::InvalidInput,
            CliError::Toml(_) | CliError::InvalidSettings(_) => ErrorCode::InvalidSettings,
            CliError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            CliError::Core(CoreError::InvalidDraft(_)) => ErrorCode::InvalidInput,
            CliError::Core(_) => ErrorCode::BusinessLogic,
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Core(CoreError::Validation(err))
    }
}

pub type CliResult<T> = Result<T, CliError>;
