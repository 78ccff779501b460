//! Generation client error types

use thiserror::Error;

/// Errors from the plan-generation service
///
/// Only plan generation surfaces these to callers; activity suggestion
/// absorbs every failure into a deterministic fallback list.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Service error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl GenerateError {
    /// Whether a retry of the identical request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerateError::Network(_) => true,
            GenerateError::Api { status, .. } => *status >= 500 || *status == 429,
            GenerateError::Malformed(_) => false,
        }
    }
}
