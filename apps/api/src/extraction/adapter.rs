use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use super::types::{DocConverter, DocxTextSource, PdfTextSource};
use super::ExtractionError;
use crate::models::document::{Document, DocumentFormat, ExtractedText};

/// Dispatches a document to the decoder for its declared format.
///
/// Decoders are injected as trait objects so tests can swap in fakes. A missing
/// converter means legacy `.doc` files fail with `unsupported-format` instead of
/// silently producing empty text.
#[derive(Clone)]
pub struct FormatAdapter {
    pdf: Arc<dyn PdfTextSource>,
    docx: Arc<dyn DocxTextSource>,
    converter: Option<Arc<dyn DocConverter>>,
    timeout: Duration,
}

impl FormatAdapter {
    pub fn new(
        pdf: Arc<dyn PdfTextSource>,
        docx: Arc<dyn DocxTextSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            pdf,
            docx,
            converter: None,
            timeout,
        }
    }

    pub fn with_converter(mut self, converter: Arc<dyn DocConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub async fn extract_text(&self, document: &Document) -> Result<ExtractedText, ExtractionError> {
        debug!(
            filename = %document.filename,
            format = document.format.as_str(),
            bytes = document.bytes.len(),
            "Extracting text"
        );

        match document.format {
            DocumentFormat::Pdf => self.extract_pdf(document.bytes.clone()).await,
            DocumentFormat::Docx => self.extract_docx(document.bytes.clone()).await,
            DocumentFormat::Doc => {
                let converter = self.converter.as_ref().ok_or_else(|| {
                    ExtractionError::UnsupportedFormat(
                        "no converter is configured for legacy .doc files".to_string(),
                    )
                })?;
                let pdf = converter.to_pdf(&document.bytes, self.timeout).await?;
                self.extract_pdf(Bytes::from(pdf)).await
            }
        }
    }

    async fn extract_pdf(&self, bytes: Bytes) -> Result<ExtractedText, ExtractionError> {
        if bytes.is_empty() {
            return Ok(ExtractedText::default());
        }
        let source = Arc::clone(&self.pdf);
        let pages = self.run_blocking(move || source.page_texts(&bytes)).await?;
        // A page without a text layer contributes an empty line, never an error.
        Ok(ExtractedText::new(pages.join("\n")))
    }

    async fn extract_docx(&self, bytes: Bytes) -> Result<ExtractedText, ExtractionError> {
        if bytes.is_empty() {
            return Ok(ExtractedText::default());
        }
        let source = Arc::clone(&self.docx);
        let text = self.run_blocking(move || source.text(&bytes)).await?;
        Ok(ExtractedText::new(text))
    }

    /// Runs a decoder on the blocking pool, bounded by the per-document timeout.
    /// A panicking decoder is reported as a decode error.
    async fn run_blocking<T, F>(&self, f: F) -> Result<T, ExtractionError>
    where
        F: FnOnce() -> Result<T, ExtractionError> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ExtractionError::Decode(format!(
                "decoder aborted: {join_err}"
            ))),
            Err(_) => Err(ExtractionError::Timeout(self.timeout)),
        }
    }
}
