//! Session-scoped state: the image queue, the latest results, and the
//! configuration that gates a run.
//!
//! One `SessionState` per operator session, created at session start and
//! passed explicitly to the pipeline, never ambient. A single control
//! thread mutates it, so edits are plain last-write-wins.

use thiserror::Error;

use crate::config::ExtractionConfig;
use crate::models::contact::{ContactField, ContactRecord};
use crate::models::image::{ImageQueue, ImageRecord};
use crate::pipeline::client::VisionClient;
use crate::pipeline::error::{ConfigError, ExtractionError};
use crate::pipeline::runner::{run_batch, BatchProgress, BatchReport, CancelFlag};

/// What to do with the previous result set when a new run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPolicy {
    /// Discard the previous results wholesale. The default.
    #[default]
    Replace,
    /// Keep previous results; a re-extracted file name replaces its old
    /// record in place and new names append.
    Accumulate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no record at index {0}")]
    IndexOutOfRange(usize),
}

// ═══════════════════════════════════════════════════════════
// ResultStore
// ═══════════════════════════════════════════════════════════

/// The ordered results of the latest run(s), plus the source images for
/// side-by-side display. Mutated only through explicit field edits or run
/// application.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Vec<ContactRecord>,
    images: Vec<ImageRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Source image for a record, for display next to its row.
    pub fn image_for(&self, file_name: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|image| image.name() == file_name)
    }

    /// Apply one user correction in place. Only the addressed field
    /// changes; the record's error tag is not addressable and stays as
    /// created. Empty or whitespace-only input clears the field.
    pub fn set_field(
        &mut self,
        index: usize,
        field: ContactField,
        value: &str,
    ) -> Result<(), StoreError> {
        let record = self
            .records
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange(index))?;

        let trimmed = value.trim();
        let value = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };

        match field {
            ContactField::Name => record.name = value,
            ContactField::Title => record.title = value,
            ContactField::CompanyName => record.company_name = value,
            ContactField::PhoneNumber => record.phone_number = value,
            ContactField::EmailAddress => record.email_address = value,
            ContactField::CompanyAddress => record.company_address = value,
            ContactField::CompanyWebsite => record.company_website = value,
        }
        Ok(())
    }

    /// Replace the whole result set: the default post-run policy.
    pub fn replace_all(&mut self, records: Vec<ContactRecord>, images: Vec<ImageRecord>) {
        self.records = records;
        self.images = images;
    }

    /// Fold a new run into the existing results, deduplicating by file
    /// name: a re-extracted name replaces its previous record in place,
    /// preserving first-seen order; new names append.
    pub fn accumulate(&mut self, records: Vec<ContactRecord>, images: Vec<ImageRecord>) {
        for record in records {
            match self
                .records
                .iter_mut()
                .find(|existing| existing.file_name == record.file_name)
            {
                Some(existing) => *existing = record,
                None => self.records.push(record),
            }
        }
        for image in images {
            match self
                .images
                .iter_mut()
                .find(|existing| existing.name() == image.name())
            {
                Some(existing) => *existing = image,
                None => self.images.push(image),
            }
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.images.clear();
    }
}

// ═══════════════════════════════════════════════════════════
// SessionState
// ═══════════════════════════════════════════════════════════

/// All mutable state for one operator session.
#[derive(Debug)]
pub struct SessionState {
    queue: ImageQueue,
    results: ResultStore,
    config: ExtractionConfig,
}

impl SessionState {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            queue: ImageQueue::new(),
            results: ResultStore::new(),
            config,
        }
    }

    pub fn queue(&self) -> &ImageQueue {
        &self.queue
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut ResultStore {
        &mut self.results
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ExtractionConfig {
        &mut self.config
    }

    /// Queue an image; duplicates by name are skipped.
    pub fn add_image(&mut self, record: ImageRecord) -> bool {
        self.queue.add(record)
    }

    /// Explicitly empty the queue, the only way records leave it.
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// A run may start only with a fully-populated configuration and a
    /// non-empty queue.
    pub fn can_run(&self) -> bool {
        self.config.validate().is_ok() && !self.queue.is_empty()
    }

    /// The blocking precondition, with what is missing spelled out.
    pub fn check_run_preconditions(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }

    /// Run extraction over the current queue and fold the outcome into the
    /// session. The configuration precondition is enforced here; per-item
    /// failures surface as error-tagged records, never as an `Err`.
    pub fn run_extraction(
        &mut self,
        client: &dyn VisionClient,
        policy: RunPolicy,
        cancel: Option<&CancelFlag>,
        progress_fn: Option<&dyn Fn(BatchProgress)>,
    ) -> Result<BatchReport, ExtractionError> {
        self.config.validate()?;

        let report = run_batch(&self.queue, client, cancel, progress_fn);
        self.apply_run(&report, policy);
        Ok(report)
    }

    /// Fold a finished run into the result store per the chosen policy. A
    /// cancelled run is still applied so the operator sees what completed.
    pub fn apply_run(&mut self, report: &BatchReport, policy: RunPolicy) {
        let images: Vec<ImageRecord> = report
            .records
            .iter()
            .filter_map(|record| {
                self.queue
                    .iter()
                    .find(|image| image.name() == record.file_name)
                    .cloned()
            })
            .collect();

        match policy {
            RunPolicy::Replace => self.results.replace_all(report.records.clone(), images),
            RunPolicy::Accumulate => self.results.accumulate(report.records.clone(), images),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiCredential;
    use crate::models::contact::ContactFields;
    use crate::pipeline::client::MockVisionClient;

    fn populated_config() -> ExtractionConfig {
        ExtractionConfig {
            credential: ApiCredential::new("key"),
            project_id: "proj".to_string(),
            ..ExtractionConfig::default()
        }
    }

    fn store_with(records: Vec<ContactRecord>) -> ResultStore {
        let mut store = ResultStore::new();
        store.replace_all(records, Vec::new());
        store
    }

    fn jane() -> ContactRecord {
        ContactRecord::success(
            "a.jpg",
            ContactFields {
                name: Some("Jane Doe".to_string()),
                company_name: Some("Acme".to_string()),
                ..ContactFields::default()
            },
        )
    }

    const JANE_JSON: &str = r#"{"Name": "Jane Doe", "Company Name": "Acme"}"#;

    #[test]
    fn set_field_touches_exactly_one_field_of_one_record() {
        let mut store = store_with(vec![jane(), ContactRecord::success("b.jpg", ContactFields::default())]);

        store
            .set_field(0, ContactField::Name, "Janet Doe")
            .unwrap();

        assert_eq!(store.records()[0].name.as_deref(), Some("Janet Doe"));
        assert_eq!(store.records()[0].company_name.as_deref(), Some("Acme"));
        assert!(store.records()[1].name.is_none());
    }

    #[test]
    fn set_field_clears_on_empty_input() {
        let mut store = store_with(vec![jane()]);
        store.set_field(0, ContactField::CompanyName, "  ").unwrap();
        assert!(store.records()[0].company_name.is_none());
    }

    #[test]
    fn set_field_leaves_error_tag_alone() {
        let mut store = store_with(vec![ContactRecord::failure("x.jpg", "timed out")]);
        store.set_field(0, ContactField::Name, "Filled By Hand").unwrap();
        assert_eq!(store.records()[0].name.as_deref(), Some("Filled By Hand"));
        assert_eq!(store.records()[0].error.as_deref(), Some("timed out"));
    }

    #[test]
    fn set_field_out_of_range_is_reported() {
        let mut store = store_with(vec![jane()]);
        assert_eq!(
            store.set_field(5, ContactField::Name, "x"),
            Err(StoreError::IndexOutOfRange(5))
        );
    }

    #[test]
    fn replace_all_discards_previous_results() {
        let mut store = store_with(vec![jane()]);
        store.replace_all(
            vec![ContactRecord::success("new.jpg", ContactFields::default())],
            Vec::new(),
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].file_name, "new.jpg");
    }

    #[test]
    fn accumulate_dedups_by_file_name_in_place() {
        let mut store = store_with(vec![
            jane(),
            ContactRecord::success("b.jpg", ContactFields::default()),
        ]);

        let rerun = ContactRecord::success(
            "a.jpg",
            ContactFields {
                name: Some("Jane D. Doe".to_string()),
                ..ContactFields::default()
            },
        );
        let fresh = ContactRecord::success("c.jpg", ContactFields::default());
        store.accumulate(vec![rerun, fresh], Vec::new());

        assert_eq!(store.len(), 3);
        // Replaced in place, first-seen order preserved.
        assert_eq!(store.records()[0].file_name, "a.jpg");
        assert_eq!(store.records()[0].name.as_deref(), Some("Jane D. Doe"));
        assert_eq!(store.records()[1].file_name, "b.jpg");
        assert_eq!(store.records()[2].file_name, "c.jpg");
    }

    #[test]
    fn can_run_requires_config_and_images() {
        let mut session = SessionState::new(ExtractionConfig::default());
        assert!(!session.can_run());

        session.add_image(ImageRecord::new("a.jpg", vec![1, 2, 3]));
        assert!(!session.can_run(), "missing credential/project still blocks");

        *session.config_mut() = populated_config();
        assert!(session.can_run());

        session.clear_queue();
        assert!(!session.can_run());
    }

    #[test]
    fn run_extraction_blocks_on_invalid_config() {
        let mut session = SessionState::new(ExtractionConfig::default());
        session.add_image(ImageRecord::new("a.jpg", vec![1]));

        let client = MockVisionClient::new(JANE_JSON);
        let result = session.run_extraction(&client, RunPolicy::Replace, None, None);

        assert!(matches!(result, Err(ExtractionError::Config(_))));
        // Precondition failure means no inference call was made.
        assert_eq!(client.calls(), 0);
        assert!(session.results().is_empty());
    }

    #[test]
    fn run_extraction_replaces_results_by_default() {
        let mut session = SessionState::new(populated_config());
        session.add_image(ImageRecord::new("a.jpg", vec![1]));

        let client = MockVisionClient::new(JANE_JSON);
        let report = session
            .run_extraction(&client, RunPolicy::Replace, None, None)
            .unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results().records()[0].name.as_deref(), Some("Jane Doe"));
        // Source bytes travel along for display.
        assert!(session.results().image_for("a.jpg").is_some());
        // The queue is untouched by a run; only clear_queue empties it.
        assert_eq!(session.queue().len(), 1);

        // A second run replaces, not appends.
        session
            .run_extraction(&client, RunPolicy::Replace, None, None)
            .unwrap();
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn run_extraction_accumulates_on_request() {
        let mut session = SessionState::new(populated_config());
        session.add_image(ImageRecord::new("a.jpg", vec![1]));

        let client = MockVisionClient::new(JANE_JSON);
        session
            .run_extraction(&client, RunPolicy::Replace, None, None)
            .unwrap();

        session.clear_queue();
        session.add_image(ImageRecord::new("b.jpg", vec![2]));
        session
            .run_extraction(&client, RunPolicy::Accumulate, None, None)
            .unwrap();

        let names: Vec<_> = session
            .results()
            .records()
            .iter()
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }
}
