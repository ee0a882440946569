// Batch orchestration: uploads -> Documents -> text -> CandidateRecords.
// Per-document failures become diagnostics; a batch as a whole never fails.

pub mod handlers;
pub mod runner;
pub mod types;

pub use runner::Pipeline;
pub use types::BatchOutcome;
