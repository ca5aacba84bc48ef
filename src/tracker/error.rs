//! Error types for progress tracking

use thiserror::Error;

/// Errors that can occur when recording or exporting progress
///
/// Absence of data is never an error: unknown users produce empty lists or
/// `None` from the read operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Caller passed a value that would corrupt the cumulative counters
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// Name of the offending argument
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TrackerError {
    /// Shorthand for an [`TrackerError::InvalidInput`]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TrackerError::InvalidInput { field, reason: reason.into() }
    }

    /// Check if this error was caused by the caller's arguments
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, TrackerError::InvalidInput { .. })
    }
}
