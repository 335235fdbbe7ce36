//! Source images and the session queue.

use chrono::NaiveDateTime;

use crate::pipeline::mime::{self, ImageContentType};

// ═══════════════════════════════════════════════════════════
// ImageRecord
// ═══════════════════════════════════════════════════════════

/// One candidate source image awaiting extraction. Immutable after
/// creation; the queue owns it until a batch run consumes it.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    name: String,
    bytes: Vec<u8>,
    content_type: ImageContentType,
}

impl ImageRecord {
    /// Create a record from a filename and raw bytes. The content type is
    /// detected from the filename extension once, at ingestion.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = mime::detect(&name);
        Self {
            name,
            bytes,
            content_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn content_type(&self) -> ImageContentType {
        self.content_type
    }
}

// ═══════════════════════════════════════════════════════════
// ImageQueue
// ═══════════════════════════════════════════════════════════

/// Ordered collection of pending images for one session. Records leave the
/// queue only through an explicit `clear`.
#[derive(Debug, Default)]
pub struct ImageQueue {
    records: Vec<ImageRecord>,
}

impl ImageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image to the queue. Returns `false` and leaves the queue
    /// unchanged when a record with the same name is already present.
    pub fn add(&mut self, record: ImageRecord) -> bool {
        if self.contains(record.name()) {
            tracing::debug!(name = %record.name(), "Skipping duplicate queue entry");
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    /// Remove every queued image.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Synthesize a name for a camera-sourced capture. Timestamp-based so
    /// repeated captures collide neither with uploads nor with each other.
    pub fn capture_name(at: NaiveDateTime) -> String {
        format!("capture_{}.jpg", at.format("%Y%m%d_%H%M%S"))
    }
}
