use std::time::Duration;

use async_trait::async_trait;

use super::ExtractionError;

/// PDF text capability. Returns one string per page, in page order.
pub trait PdfTextSource: Send + Sync {
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// DOCX text capability. Paragraphs and flattened tables, in document order.
pub trait DocxTextSource: Send + Sync {
    fn text(&self, docx_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Legacy `.doc` transcoder. Produces PDF bytes the PDF path can read.
///
/// Implementations own any temporary files they create and must remove them
/// before returning, whatever the outcome.
#[async_trait]
pub trait DocConverter: Send + Sync {
    async fn to_pdf(&self, doc_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, ExtractionError>;
}
