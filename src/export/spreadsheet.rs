//! XLSX rendering, behind the `xlsx` cargo feature.
//!
//! A build without the feature still compiles and exports CSV/JSON; the
//! spreadsheet call then reports a recoverable capability error so the
//! interactive layer disables only that one download option.

use super::ExportError;
use crate::models::contact::ContactRecord;

/// Render records as a single-sheet XLSX workbook (`Sheet1`, canonical
/// header row).
#[cfg(feature = "xlsx")]
pub fn to_spreadsheet(records: &[ContactRecord]) -> Result<Vec<u8>, ExportError> {
    use rust_xlsxwriter::Workbook;

    use super::{batch_has_errors, header, row_values};

    let with_error = batch_has_errors(records);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name("Sheet1")
        .map_err(|e| ExportError::Spreadsheet(e.to_string()))?;

    for (col, title) in header(with_error).iter().enumerate() {
        sheet
            .write_string(0, col as u16, *title)
            .map_err(|e| ExportError::Spreadsheet(e.to_string()))?;
    }

    for (row, record) in records.iter().enumerate() {
        for (col, cell) in row_values(record, with_error).iter().enumerate() {
            if let Some(text) = cell {
                sheet
                    .write_string(row as u32 + 1, col as u16, *text)
                    .map_err(|e| ExportError::Spreadsheet(e.to_string()))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Spreadsheet(e.to_string()))
}

/// Capability absent in this build.
#[cfg(not(feature = "xlsx"))]
pub fn to_spreadsheet(_records: &[ContactRecord]) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::SpreadsheetUnavailable)
}
