//! The canonical per-image extraction result.
//!
//! A `ContactRecord` is either a successful extraction or an error
//! placeholder, never a partial mix presented as success. `file_name` is
//! the join key back to the source image.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical export column order, shared by every export format. The
/// `Error` column is appended only when the batch contains a failed record.
pub const COLUMNS: [&str; 8] = [
    "File Name",
    "Company Name",
    "Name",
    "Title",
    "Phone Number",
    "Email Address",
    "Company Address",
    "Company Website",
];

pub const ERROR_COLUMN: &str = "Error";

// ═══════════════════════════════════════════════════════════
// ContactFields
// ═══════════════════════════════════════════════════════════

/// The seven informational fields a card can yield, without the source
/// file name or error tag. Produced by the response parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
}

// ═══════════════════════════════════════════════════════════
// ContactRecord
// ═══════════════════════════════════════════════════════════

/// One extraction result. Field order matches the canonical column order so
/// serialized output keeps it; the serde renames are the column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(rename = "File Name")]
    pub file_name: String,
    #[serde(rename = "Company Name", default)]
    pub company_name: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Phone Number", default)]
    pub phone_number: Option<String>,
    #[serde(rename = "Email Address", default)]
    pub email_address: Option<String>,
    #[serde(rename = "Company Address", default)]
    pub company_address: Option<String>,
    #[serde(rename = "Company Website", default)]
    pub company_website: Option<String>,
    /// Null unless extraction or parsing failed for this image. Immutable
    /// after creation; user edits address informational fields only.
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactRecord {
    /// A successful extraction.
    pub fn success(file_name: impl Into<String>, fields: ContactFields) -> Self {
        Self {
            file_name: file_name.into(),
            company_name: fields.company_name,
            name: fields.name,
            title: fields.title,
            phone_number: fields.phone_number,
            email_address: fields.email_address,
            company_address: fields.company_address,
            company_website: fields.company_website,
            error: None,
        }
    }

    /// An error placeholder: every informational field stays empty so a
    /// failure is never displayed as a partial success.
    pub fn failure(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            company_name: None,
            name: None,
            title: None,
            phone_number: None,
            email_address: None,
            company_address: None,
            company_website: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ═══════════════════════════════════════════════════════════
// ContactField
// ═══════════════════════════════════════════════════════════

/// Typed selector for in-place edits of one informational field. The source
/// file name and the error tag are not addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Title,
    CompanyName,
    PhoneNumber,
    EmailAddress,
    CompanyAddress,
    CompanyWebsite,
}

impl ContactField {
    /// Canonical column header for this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Title => "Title",
            Self::CompanyName => "Company Name",
            Self::PhoneNumber => "Phone Number",
            Self::EmailAddress => "Email Address",
            Self::CompanyAddress => "Company Address",
            Self::CompanyWebsite => "Company Website",
        }
    }

    pub fn all() -> &'static [ContactField] {
        &[
            Self::Name,
            Self::Title,
            Self::CompanyName,
            Self::PhoneNumber,
            Self::EmailAddress,
            Self::CompanyAddress,
            Self::CompanyWebsite,
        ]
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContactField {
    type Err = ();

    /// Parse a column header back into a field selector, for interactive
    /// layers that address fields by header text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactField::all()
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}
