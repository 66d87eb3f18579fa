//! HTTP-facing error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::storage::StorageError;

/// Errors surfaced by the HTTP handlers.
///
/// Maps to a JSON `{"error": ...}` payload: client mistakes become 400,
/// everything else a 500.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request was malformed (missing file, missing question, etc.).
    #[error("{0}")]
    BadRequest(String),

    /// An internal failure that is not attributable to a collaborator.
    #[error("{0}")]
    Internal(String),

    /// A retrieval/answering failure.
    #[error(transparent)]
    Rag(#[from] corpus_rag::RagError),

    /// A text extraction failure.
    #[error(transparent)]
    Extract(#[from] corpus_extract::ExtractError),

    /// An object storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Storage(StorageError::InvalidKey(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
