//! Classifier error types.

use thiserror::Error;

/// Errors that can occur when talking to the classification service.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The service answered with a non-success status.
    #[error("classification API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body was not `{"predicted": int}`.
    #[error("invalid classification response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}
