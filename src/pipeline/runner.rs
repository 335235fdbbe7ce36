//! Batch orchestration: drives every queued image through the pipeline.
//!
//! Items run strictly sequentially, one inference call in flight at a
//! time, so progress reporting and failure isolation stay deterministic.
//! Any per-item failure is converted to an error-tagged record at the item
//! boundary and the batch continues.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::client::VisionClient;
use super::error::ExtractionError;
use super::parser;
use super::prompt;
use crate::models::contact::{ContactFields, ContactRecord};
use crate::models::image::{ImageQueue, ImageRecord};

// ═══════════════════════════════════════════════════════════
// Progress & cancellation
// ═══════════════════════════════════════════════════════════

/// Progress events observable by the caller: the only externally visible
/// side effect of a run besides the final report.
#[derive(Debug, Clone)]
pub enum BatchProgress {
    Started {
        total: usize,
    },
    ItemCompleted {
        completed: usize,
        total: usize,
        file_name: String,
        failed: bool,
    },
    Completed {
        total: usize,
        failures: usize,
        duration_ms: u64,
    },
    Cancelled {
        completed: usize,
        total: usize,
    },
}

/// Cooperative cancel flag, checked at item boundaries only; the in-flight
/// call always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One record per consumed image, in queue order. Matches the queue
    /// length exactly unless the run was cancelled.
    pub records: Vec<ContactRecord>,
    /// Items whose record carries an error tag.
    pub failures: usize,
    pub cancelled: bool,
    pub duration_ms: u64,
}

// ═══════════════════════════════════════════════════════════
// Batch loop
// ═══════════════════════════════════════════════════════════

/// Run the pipeline over every queued image in order. Produces exactly one
/// record per image; a failed item yields an error placeholder and the
/// batch moves on.
pub fn run_batch(
    queue: &ImageQueue,
    client: &dyn VisionClient,
    cancel: Option<&CancelFlag>,
    progress_fn: Option<&dyn Fn(BatchProgress)>,
) -> BatchReport {
    let start = Instant::now();
    let total = queue.len();

    if let Some(progress) = progress_fn {
        progress(BatchProgress::Started { total });
    }

    let mut records = Vec::with_capacity(total);
    let mut failures = 0usize;
    let mut cancelled = false;

    for (i, image) in queue.iter().enumerate() {
        if cancel.is_some_and(|flag| flag.is_cancelled()) {
            cancelled = true;
            tracing::info!(completed = i, total, "Batch abandoned at item boundary");
            if let Some(progress) = progress_fn {
                progress(BatchProgress::Cancelled {
                    completed: i,
                    total,
                });
            }
            break;
        }

        let (record, failed) = match extract_one(client, image) {
            Ok(fields) => (ContactRecord::success(image.name(), fields), false),
            Err(e) => {
                failures += 1;
                tracing::warn!(
                    file = %image.name(),
                    error = %e,
                    "Extraction failed, continuing batch"
                );
                (ContactRecord::failure(image.name(), e.to_string()), true)
            }
        };
        records.push(record);

        if let Some(progress) = progress_fn {
            progress(BatchProgress::ItemCompleted {
                completed: i + 1,
                total,
                file_name: image.name().to_string(),
                failed,
            });
        }
    }

    let duration_ms = start.elapsed().as_millis() as u64;

    if !cancelled {
        if let Some(progress) = progress_fn {
            progress(BatchProgress::Completed {
                total,
                failures,
                duration_ms,
            });
        }
    }

    BatchReport {
        records,
        failures,
        cancelled,
        duration_ms,
    }
}

/// One image through build → infer → parse.
fn extract_one(
    client: &dyn VisionClient,
    image: &ImageRecord,
) -> Result<ContactFields, ExtractionError> {
    let _span = tracing::info_span!(
        "extract_card",
        file = %image.name(),
        image_size = image.bytes().len(),
    )
    .entered();

    let request = prompt::build_request(image.bytes(), image.content_type());
    let raw = client.chat(&request)?;
    let fields = parser::parse(&raw)?;
    Ok(fields)
}
