//! CSV rendering: UTF-8, comma-separated, canonical header row.

use csv::WriterBuilder;

use super::{batch_has_errors, header, row_values, ExportError};
use crate::models::contact::ContactRecord;

/// Render records as CSV bytes. Missing values render as empty cells.
pub fn to_csv(records: &[ContactRecord]) -> Result<Vec<u8>, ExportError> {
    let with_error = batch_has_errors(records);

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(header(with_error))
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for record in records {
        let cells = row_values(record, with_error);
        writer
            .write_record(cells.iter().map(|cell| cell.unwrap_or("")))
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_fixtures::*;

    fn render(records: &[ContactRecord]) -> String {
        String::from_utf8(to_csv(records).unwrap()).unwrap()
    }

    #[test]
    fn clean_batch_has_canonical_header_without_error() {
        let text = render(&[success_record(), sparse_record()]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "File Name,Company Name,Name,Title,Phone Number,Email Address,Company Address,Company Website"
        );
    }

    #[test]
    fn failed_batch_appends_error_column() {
        let text = render(&[success_record(), failed_record()]);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].ends_with(",Company Website,Error"));
        // The successful row has an empty error cell.
        assert!(lines[1].ends_with(","));
        assert!(lines[2].contains("timed out"));
    }

    #[test]
    fn sparse_fields_render_as_empty_cells() {
        let text = render(&[sparse_record()]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[1], "card2.png,,Sam Lee,,,,,");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let text = render(&[success_record()]);
        assert!(text.contains("\"1 Main St, Springfield\""));
    }

    #[test]
    fn empty_result_set_still_emits_header() {
        let text = render(&[]);
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("File Name,"));
    }
}
