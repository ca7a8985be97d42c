//! Error Handling
//!
//! Unified error types for the sync engine.
//! Uses thiserror for ergonomic error definitions.
//!
//! Remote failures never surface as `Err`: they are stored on the relevant
//! cache entry for the UI to render. `AppError` is reserved for local misuse
//! of the engine API and transport-level faults.

use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation errors (e.g. committing with an empty message)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport errors (channel closed, send failure)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert AppError to a string suitable for UI surfaces
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
