use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::types::{BatchOutcome, DocumentState, FailureDiagnostic};
use crate::extraction::FormatAdapter;
use crate::fields::FieldExtractor;
use crate::models::candidate::CandidateRecord;
use crate::models::document::{Document, Upload};

/// Runs a batch of uploads through text extraction and field extraction.
///
/// Up to `max_concurrent` documents are in flight at once. Output order always
/// equals upload order, whatever order documents finish in.
pub struct Pipeline {
    adapter: FormatAdapter,
    extractor: Arc<FieldExtractor>,
    max_concurrent: usize,
}

impl Pipeline {
    pub fn new(adapter: FormatAdapter, extractor: FieldExtractor, max_concurrent: usize) -> Self {
        Self {
            adapter,
            extractor: Arc::new(extractor),
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn run(&self, uploads: Vec<Upload>) -> BatchOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id, documents = uploads.len());

        async move {
            info!("Starting batch");

            let results: Vec<Result<CandidateRecord, FailureDiagnostic>> = stream::iter(uploads)
                .map(|upload| self.process(upload))
                .buffered(self.max_concurrent)
                .collect()
                .await;

            let mut records = Vec::with_capacity(results.len());
            let mut failures = Vec::new();
            for result in results {
                match result {
                    Ok(record) => records.push(record),
                    Err(diag) => failures.push(diag),
                }
            }

            info!(
                succeeded = records.len(),
                failed = failures.len(),
                "Batch finished"
            );
            BatchOutcome::new(run_id, records, failures)
        }
        .instrument(span)
        .await
    }

    /// One document through the state machine. Never panics the batch.
    async fn process(&self, upload: Upload) -> Result<CandidateRecord, FailureDiagnostic> {
        let filename = upload.filename.clone();
        transition(&filename, DocumentState::Queued);

        transition(&filename, DocumentState::TextExtracting);
        let extracted = match Document::from_upload(upload) {
            Ok(document) => self.adapter.extract_text(&document).await,
            Err(e) => Err(e),
        };
        let text = match extracted {
            Ok(text) => text,
            Err(e) => {
                let diag = FailureDiagnostic::from_error(&filename, &e);
                warn!(
                    filename = %filename,
                    reason = diag.reason.as_str(),
                    "Document failed: {e}"
                );
                transition(&filename, DocumentState::Failed);
                return Err(diag);
            }
        };

        transition(&filename, DocumentState::FieldExtracting);
        let record = self.extractor.extract_fields(&text, &filename).await;
        if record.is_blank() {
            debug!(filename = %filename, "No fields recovered");
        }

        transition(&filename, DocumentState::Done);
        Ok(record)
    }
}

fn transition(filename: &str, state: DocumentState) {
    debug!(filename, state = state.as_str(), "Document state");
}
