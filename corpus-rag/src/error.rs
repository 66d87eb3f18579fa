//! Error types for the `corpus-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval and answering operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred while calling the completion model.
    #[error("Completion error: {0}")]
    Completion(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
