//! Result exports: CSV, JSON, and spreadsheet byte streams.
//!
//! All three formats share one column order. The `Error` column appears
//! only when the batch contains a failed record, and image bytes never
//! leave the session in any format.

mod csv;
mod json;
mod spreadsheet;

use thiserror::Error;

pub use self::csv::to_csv;
pub use self::json::to_json;
pub use self::spreadsheet::to_spreadsheet;

use crate::models::contact::{ContactRecord, COLUMNS, ERROR_COLUMN};

/// Canonical output file names, kept for compatibility with prior tooling
/// that consumes these exports.
pub const CSV_FILE_NAME: &str = "namecards_extracted.csv";
pub const JSON_FILE_NAME: &str = "namecards_extracted.json";
pub const SPREADSHEET_FILE_NAME: &str = "namecards_extracted.xlsx";

#[derive(Error, Debug)]
pub enum ExportError {
    /// The spreadsheet rendering capability is absent from this build.
    /// Recoverable: only that one export option is disabled, CSV and JSON
    /// stay available.
    #[error(
        "spreadsheet export is unavailable: this build omits the `xlsx` feature; \
         rebuild with `--features xlsx` or download CSV/JSON instead"
    )]
    SpreadsheetUnavailable,

    #[error("spreadsheet rendering failed: {0}")]
    Spreadsheet(String),

    #[error("CSV rendering failed: {0}")]
    Csv(String),

    #[error("JSON rendering failed: {0}")]
    Json(String),
}

/// True when any record failed; the `Error` column then appears in every
/// row of this batch's exports.
pub(crate) fn batch_has_errors(records: &[ContactRecord]) -> bool {
    records.iter().any(|record| record.error.is_some())
}

/// Header row shared by every format.
pub(crate) fn header(with_error: bool) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = COLUMNS.to_vec();
    if with_error {
        columns.push(ERROR_COLUMN);
    }
    columns
}

/// Cell values for one record, in header order. `None` renders as the
/// format's own empty representation.
pub(crate) fn row_values(record: &ContactRecord, with_error: bool) -> Vec<Option<&str>> {
    let mut cells = vec![
        Some(record.file_name.as_str()),
        record.company_name.as_deref(),
        record.name.as_deref(),
        record.title.as_deref(),
        record.phone_number.as_deref(),
        record.email_address.as_deref(),
        record.company_address.as_deref(),
        record.company_website.as_deref(),
    ];
    if with_error {
        cells.push(record.error.as_deref());
    }
    cells
}
