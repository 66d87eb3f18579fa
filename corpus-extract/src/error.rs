//! Error types for the `corpus-extract` crate.

use thiserror::Error;

/// Errors that can occur while turning raw upload bytes into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The PDF parser rejected the document.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// The spreadsheet reader rejected the document.
    #[error("Spreadsheet extraction failed: {0}")]
    Spreadsheet(String),
}

/// A convenience result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
