//! The extraction pipeline: content-type detection, prompt construction,
//! inference, response parsing, and batch orchestration.
//!
//! ```text
//! ImageQueue → run_batch (mime → prompt → client → parser) → ContactRecords
//! ```
//!
//! Items run strictly sequentially. One item's failure becomes its record's
//! error tag and never halts the rest of the batch.

pub mod client;
pub mod error;
pub mod mime;
pub mod parser;
pub mod prompt;
pub mod runner;

pub use client::{MockVisionClient, VisionClient, WatsonxClient};
pub use error::{ConfigError, ExtractionError, InferenceError, ParseError};
pub use mime::ImageContentType;
pub use parser::{parse, parse_with_mode, ParseMode};
pub use prompt::{build_request, ChatRequest, EXTRACTION_PROMPT};
pub use runner::{run_batch, BatchProgress, BatchReport, CancelFlag};
