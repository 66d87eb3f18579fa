//! Spreadsheet text extraction.
//!
//! Every sheet in the workbook is flattened row-wise: the first row supplies
//! column headers and each following row becomes `header: value` lines.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use tracing::debug;

use crate::error::{ExtractError, Result};

/// Extract the text content of a spreadsheet (xlsx, xls, ods).
///
/// # Errors
///
/// Returns [`ExtractError::Spreadsheet`] when the bytes are not a parseable
/// workbook.
pub fn extract(bytes: &[u8]) -> Result<String> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ExtractError::Spreadsheet(e.to_string()))?;

    let mut out = String::new();
    for (name, range) in workbook.worksheets() {
        let rows: Vec<Vec<String>> =
            range.rows().map(|row| row.iter().map(cell_text).collect()).collect();
        let flattened = flatten_rows(&rows);
        if flattened.is_empty() {
            debug!(sheet = %name, "skipping sheet with no data rows");
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&flattened);
    }

    Ok(out)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Flatten header + data rows into `header: value` lines, one row per block.
fn flatten_rows(rows: &[Vec<String>]) -> String {
    let Some((headers, data_rows)) = rows.split_first() else {
        return String::new();
    };

    let mut out = String::new();
    for row in data_rows {
        for (header, value) in headers.iter().zip(row) {
            if value.is_empty() {
                continue;
            }
            out.push_str(header);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter().map(|row| row.iter().map(|c| c.to_string()).collect()).collect()
    }

    #[test]
    fn rows_become_header_value_lines() {
        let flattened = flatten_rows(&rows(&[
            &["name", "role"],
            &["ada", "engineer"],
            &["grace", "admiral"],
        ]));
        assert_eq!(flattened, "name: ada\nrole: engineer\nname: grace\nrole: admiral\n");
    }

    #[test]
    fn empty_cells_are_skipped() {
        let flattened = flatten_rows(&rows(&[&["name", "role"], &["ada", ""]]));
        assert_eq!(flattened, "name: ada\n");
    }

    #[test]
    fn header_only_sheet_yields_nothing() {
        assert_eq!(flatten_rows(&rows(&[&["name", "role"]])), "");
        assert_eq!(flatten_rows(&[]), "");
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = extract(b"not a workbook");
        assert!(matches!(result, Err(ExtractError::Spreadsheet(_))));
    }
}
