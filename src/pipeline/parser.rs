//! Decode the model's raw completion into contact fields.
//!
//! The instruction demands bare JSON, but vision models still wrap output
//! in markdown fences, so fence markers are stripped before decoding. Two
//! key vocabularies are normalized here, at the parser boundary; downstream
//! code only ever sees the canonical schema.

use serde_json::{Map, Value};

use super::error::ParseError;
use crate::models::contact::ContactFields;

/// How to treat canonical keys absent from the completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Absent keys become null. The default: models drop keys often enough
    /// that rejecting the whole card is worse than a sparse row.
    #[default]
    Permissive,
    /// Absent keys fail the item, reporting the full missing-key list.
    Strict,
}

/// Per-field key lookup: canonical name first, then the short vocabulary
/// the model sometimes answers with. The longer name wins when both are
/// present.
const FIELD_KEYS: [(&str, Option<&str>); 7] = [
    ("Name", None),
    ("Title", None),
    ("Company Name", Some("Company")),
    ("Phone Number", Some("Phone")),
    ("Email Address", Some("Email")),
    ("Company Address", Some("Address")),
    ("Company Website", Some("Website")),
];

/// Parse a raw completion with the default permissive mode.
pub fn parse(raw: &str) -> Result<ContactFields, ParseError> {
    parse_with_mode(raw, ParseMode::default())
}

/// Parse a raw completion: strip fence markers, decode the JSON object,
/// normalize both key vocabularies into the canonical schema.
pub fn parse_with_mode(raw: &str, mode: ParseMode) -> Result<ContactFields, ParseError> {
    let cleaned = strip_fences(raw);
    let value: Value =
        serde_json::from_str(&cleaned).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let map = value.as_object().ok_or(ParseError::NotAnObject)?;

    let mut resolved: [Option<String>; 7] = Default::default();
    let mut missing = Vec::new();

    for (slot, (canonical, short)) in resolved.iter_mut().zip(FIELD_KEYS) {
        match lookup(map, canonical, short)? {
            Some(value) => *slot = value,
            None => missing.push(canonical.to_string()),
        }
    }

    if mode == ParseMode::Strict && !missing.is_empty() {
        return Err(ParseError::MissingKeys(missing));
    }

    let [name, title, company_name, phone_number, email_address, company_address, company_website] =
        resolved;

    Ok(ContactFields {
        name,
        title,
        company_name,
        phone_number,
        email_address,
        company_address,
        company_website,
    })
}

/// Strip markdown code-fence markers wherever they appear. Idempotent on
/// already-clean text.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Look up a field under its canonical key, falling back to the short
/// vocabulary. `Ok(None)` means neither key is present.
fn lookup(
    map: &Map<String, Value>,
    canonical: &str,
    short: Option<&str>,
) -> Result<Option<Option<String>>, ParseError> {
    let (key, value) = match map.get(canonical) {
        Some(value) => (canonical, value),
        None => match short.and_then(|s| map.get(s).map(|v| (s, v))) {
            Some(found) => found,
            None => return Ok(None),
        },
    };
    normalize_value(key, value).map(Some)
}

/// Null and empty strings both mean "missing"; other scalars keep their
/// display form. Arrays and objects are a malformed response.
fn normalize_value(key: &str, value: &Value) -> Result<Option<String>, ParseError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) => Err(ParseError::UnsupportedValue {
            key: key.to_string(),
            found: "array",
        }),
        Value::Object(_) => Err(ParseError::UnsupportedValue {
            key: key.to_string(),
            found: "object",
        }),
    }
}
