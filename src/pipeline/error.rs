//! Error taxonomy for the extraction pipeline.
//!
//! Per-item failures (inference, parse) are recovered at the batch boundary
//! into error-tagged records; configuration problems block a run before it
//! starts. The two per-item classes stay distinguishable for diagnostics
//! even though both end up in the same `error` field.

use thiserror::Error;

/// The vision service call failed for one item.
#[derive(Error, Debug, Clone)]
pub enum InferenceError {
    #[error("cannot reach inference service at {0}")]
    Connection(String),

    #[error("inference request timed out after {0}s")]
    Timeout(u64),

    #[error("inference service rejected the credential")]
    AuthRejected,

    #[error("inference service error (HTTP {status}): {body}")]
    Service { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("malformed completion payload: {0}")]
    MalformedCompletion(String),

    #[error("inference service returned an empty completion")]
    EmptyCompletion,
}

/// The model's completion could not be decoded into the contact schema.
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("completion is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("completion is not a JSON object")]
    NotAnObject,

    #[error("field {key:?} has unsupported type: {found}")]
    UnsupportedValue { key: String, found: &'static str },

    #[error("completion is missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

/// One or more mandatory settings are absent. Blocks run initiation
/// entirely; never surfaced as a per-item error.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),
}

/// Pipeline-level umbrella used at seams that can fail for more than one
/// reason.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("response parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("batch cancelled")]
    Cancelled,
}
