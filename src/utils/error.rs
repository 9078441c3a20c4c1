//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use ghostline_core::CoreError;
use ghostline_llm::LlmError;

use crate::services::refactor::PatchApplicationError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Errors raised by workspace crates
    #[error(transparent)]
    Core(#[from] CoreError),

    /// AI backend errors
    #[error("AI backend error: {0}")]
    Llm(#[from] LlmError),

    /// Unified diff could not be applied
    #[error("Patch error: {0}")]
    Patch(#[from] PatchApplicationError),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert AppError to a string suitable for CLI and UI responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

/// Agents report through `CoreResult`; app failures inside an agent run are
/// carried across as agent errors.
impl From<AppError> for CoreError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Core(inner) => inner,
            other => CoreError::agent(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::config("missing home directory");
        assert_eq!(err.to_string(), "Configuration error: missing home directory");
    }

    #[test]
    fn test_error_conversion() {
        let err = AppError::validation("temperature out of range");
        let msg: String = err.into();
        assert!(msg.contains("Validation error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_patch_error_conversion() {
        let err: AppError = PatchApplicationError::PastEndOfFile { line: 5 }.into();
        assert!(matches!(err, AppError::Patch(_)));
        assert!(err.to_string().starts_with("Patch error"));
    }

    #[test]
    fn test_into_core_error() {
        let core: CoreError = AppError::internal("lock poisoned").into();
        assert!(matches!(core, CoreError::Agent(_)));

        let passthrough: CoreError = AppError::Core(CoreError::not_found("x")).into();
        assert!(matches!(passthrough, CoreError::NotFound(_)));
    }
}
