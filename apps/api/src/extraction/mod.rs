// Format adapter: document bytes -> plain text.
// Decoding is CPU-bound and runs inside tokio::task::spawn_blocking under a timeout.

pub mod adapter;
pub mod convert;
pub mod docx;
pub mod pdf;
pub mod types;

use std::time::Duration;

use thiserror::Error;

pub use adapter::FormatAdapter;
pub use convert::SofficeConverter;
pub use docx::DocxRsText;
pub use pdf::PdfExtractText;

/// Why a document's text could not be recovered at all.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),
}

impl ExtractionError {
    /// Stable machine-readable reason reported in batch diagnostics.
    pub fn reason(&self) -> &'static str {
        match self {
            ExtractionError::Decode(_) => "decode-error",
            ExtractionError::Conversion(_) => "conversion-error",
            ExtractionError::UnsupportedFormat(_) => "unsupported-format",
            ExtractionError::Timeout(_) => "timeout",
        }
    }
}
