//! Error types for the `corpus-model` crate.

use thiserror::Error;

/// Errors that can occur when calling a completion model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The HTTP request could not be performed.
    #[error("Completion request failed: {0}")]
    Request(String),

    /// The completion API returned a non-success status.
    #[error("Completion API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response body could not be interpreted.
    #[error("Failed to parse completion response: {0}")]
    Parse(String),

    /// A client configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
