//! Error types for Roster core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for Roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;

/// Core error type for Roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Record key is not in canonical UUID form
    #[error("Invalid record key: {0}")]
    InvalidKey(String),

    /// Stored record is not valid JSON or lacks the required shape
    #[error("Malformed record: {0}")]
    Malformed(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        RosterError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Malformed(err.to_string())
    }
}
