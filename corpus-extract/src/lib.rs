//! Text extraction for corpus.
//!
//! Turns raw upload bytes into a single text string, dispatching on the
//! file extension:
//!
//! - `pdf` → text layer extraction via [`pdf`]
//! - `xlsx` / `xls` / `ods` → row-wise flattening via [`sheet`]
//! - anything else → best-effort UTF-8 decode, undecodable bytes dropped

pub mod error;
pub mod pdf;
pub mod sheet;

pub use error::{ExtractError, Result};

use tracing::debug;

/// File extensions routed to the spreadsheet extractor.
const SHEET_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "ods"];

/// Extract text from an uploaded file.
///
/// Unknown extensions fall back to lossy UTF-8 decoding and never fail;
/// PDF and spreadsheet parse failures propagate.
///
/// # Errors
///
/// Returns [`ExtractError`] when a recognized format cannot be parsed.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String> {
    match extension(filename).as_deref() {
        Some("pdf") => {
            debug!(filename, "extracting pdf");
            pdf::extract(bytes)
        }
        Some(ext) if SHEET_EXTENSIONS.contains(&ext) => {
            debug!(filename, "extracting spreadsheet");
            sheet::extract(bytes)
        }
        _ => Ok(decode_lossy(bytes)),
    }
}

/// Lowercased extension of a filename, if it has one.
fn extension(filename: &str) -> Option<String> {
    filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Decode bytes as UTF-8, dropping undecodable sequences.
fn decode_lossy(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).chars().filter(|c| *c != '\u{FFFD}').collect(),
    }
}
