//! JSON rendering: a pretty-printed array of objects mirroring the
//! canonical column schema.

use serde::Serialize;

use super::{batch_has_errors, ExportError};
use crate::models::contact::ContactRecord;

/// One export row. Field order matches the canonical columns; serde keeps
/// declaration order, so the emitted keys stay in column order. The outer
/// `Option` on `error` drops the key entirely for clean batches while still
/// emitting `"Error": null` for clean rows inside a failed batch.
#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(rename = "File Name")]
    file_name: &'a str,
    #[serde(rename = "Company Name")]
    company_name: Option<&'a str>,
    #[serde(rename = "Name")]
    name: Option<&'a str>,
    #[serde(rename = "Title")]
    title: Option<&'a str>,
    #[serde(rename = "Phone Number")]
    phone_number: Option<&'a str>,
    #[serde(rename = "Email Address")]
    email_address: Option<&'a str>,
    #[serde(rename = "Company Address")]
    company_address: Option<&'a str>,
    #[serde(rename = "Company Website")]
    company_website: Option<&'a str>,
    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    error: Option<Option<&'a str>>,
}

impl<'a> JsonRow<'a> {
    fn new(record: &'a ContactRecord, with_error: bool) -> Self {
        Self {
            file_name: &record.file_name,
            company_name: record.company_name.as_deref(),
            name: record.name.as_deref(),
            title: record.title.as_deref(),
            phone_number: record.phone_number.as_deref(),
            email_address: record.email_address.as_deref(),
            company_address: record.company_address.as_deref(),
            company_website: record.company_website.as_deref(),
            error: with_error.then_some(record.error.as_deref()),
        }
    }
}

/// Render records as an indented UTF-8 JSON array.
pub fn to_json(records: &[ContactRecord]) -> Result<Vec<u8>, ExportError> {
    let with_error = batch_has_errors(records);
    let rows: Vec<JsonRow> = records
        .iter()
        .map(|record| JsonRow::new(record, with_error))
        .collect();

    let mut bytes =
        serde_json::to_vec_pretty(&rows).map_err(|e| ExportError::Json(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}
