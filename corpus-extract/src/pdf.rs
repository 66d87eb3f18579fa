//! PDF text extraction.
//!
//! Uses `pdf-extract` to pull the text layer out of a PDF. Page contents
//! arrive concatenated with newlines, which is the shape the chunker expects.

use crate::error::{ExtractError, Result};

/// Extract the text content of a PDF document.
///
/// # Errors
///
/// Returns [`ExtractError::Pdf`] when the bytes are not a parseable PDF.
pub fn extract(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = extract(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }
}
