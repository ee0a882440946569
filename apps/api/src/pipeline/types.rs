use serde::Serialize;
use uuid::Uuid;

use crate::extraction::ExtractionError;
use crate::models::candidate::CandidateRecord;

/// Lifecycle of one document inside a run.
///
/// `Queued -> TextExtracting -> FieldExtracting -> Done`, or
/// `Queued -> TextExtracting -> Failed` when the text cannot be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    Queued,
    TextExtracting,
    FieldExtracting,
    Done,
    Failed,
}

impl DocumentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentState::Queued => "queued",
            DocumentState::TextExtracting => "text_extracting",
            DocumentState::FieldExtracting => "field_extracting",
            DocumentState::Done => "done",
            DocumentState::Failed => "failed",
        }
    }
}

/// Why one document produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDiagnostic {
    pub filename: String,
    /// Stable reason code: `decode-error`, `conversion-error`,
    /// `unsupported-format` or `timeout`.
    pub reason: String,
    pub detail: String,
}

impl FailureDiagnostic {
    pub fn from_error(filename: impl Into<String>, err: &ExtractionError) -> Self {
        Self {
            filename: filename.into(),
            reason: err.reason().to_string(),
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Result of one pipeline run. `records` is in upload order, skipping failed documents.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub run_id: Uuid,
    pub records: Vec<CandidateRecord>,
    pub failures: Vec<FailureDiagnostic>,
    pub summary: BatchSummary,
}

impl BatchOutcome {
    pub fn new(run_id: Uuid, records: Vec<CandidateRecord>, failures: Vec<FailureDiagnostic>) -> Self {
        let summary = BatchSummary {
            total: records.len() + failures.len(),
            succeeded: records.len(),
            failed: failures.len(),
        };
        Self {
            run_id,
            records,
            failures,
            summary,
        }
    }
}
