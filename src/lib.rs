pub mod config;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod session;

use tracing_subscriber::EnvFilter;

pub use config::{ApiCredential, ExtractionConfig, GenerationParams, VisionModel};
pub use export::{to_csv, to_json, to_spreadsheet, ExportError};
pub use models::contact::{ContactField, ContactFields, ContactRecord};
pub use models::image::{ImageQueue, ImageRecord};
pub use pipeline::error::{ConfigError, ExtractionError, InferenceError, ParseError};
pub use pipeline::runner::{run_batch, BatchProgress, BatchReport, CancelFlag};
pub use pipeline::{MockVisionClient, VisionClient, WatsonxClient};
pub use session::{ResultStore, RunPolicy, SessionState, StoreError};

/// Install the global tracing subscriber. Optional: embedding applications
/// that already manage one should skip this. Honors `RUST_LOG`, defaulting
/// to info-level events from this crate.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
