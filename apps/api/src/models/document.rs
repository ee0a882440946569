use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::extraction::ExtractionError;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC_MIME: &str = "application/msword";

/// Declared format of an uploaded resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Doc,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Doc => "doc",
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        // Strip parameters such as "; charset=binary"
        let mime = content_type.split(';').next().unwrap_or("").trim();
        match mime.to_ascii_lowercase().as_str() {
            PDF_MIME => Some(DocumentFormat::Pdf),
            DOCX_MIME => Some(DocumentFormat::Docx),
            DOC_MIME => Some(DocumentFormat::Doc),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "doc" => Some(DocumentFormat::Doc),
            _ => None,
        }
    }

    /// Declared content type wins; the filename extension is the fallback.
    /// Browsers frequently send `application/octet-stream`, which is ignored.
    pub fn detect(content_type: Option<&str>, filename: &str) -> Option<Self> {
        content_type
            .and_then(Self::from_content_type)
            .or_else(|| Self::from_filename(filename))
    }
}

/// A file as received from the upload collaborator, before its format is resolved.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// One resume payload of a known format. Immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(filename: impl Into<String>, format: DocumentFormat, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            format,
            bytes: bytes.into(),
        }
    }

    pub fn from_upload(upload: Upload) -> Result<Self, ExtractionError> {
        let format = DocumentFormat::detect(upload.content_type.as_deref(), &upload.filename)
            .ok_or_else(|| {
                ExtractionError::UnsupportedFormat(format!(
                    "'{}' is not a pdf, docx or doc file",
                    upload.filename
                ))
            })?;
        Ok(Self::new(upload.filename, format, upload.bytes))
    }
}

/// Plain text recovered from a document. Never null; empty when nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Normalizes line endings, drops control characters and trailing
    /// whitespace so every downstream rule sees the same shape of text.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let unified = raw.as_ref().replace("\r\n", "\n").replace('\r', "\n");
        let lines: Vec<String> = unified
            .split('\n')
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_control() || *c == '\t')
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();
        Self(lines.join("\n").trim_end().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_takes_precedence_over_extension() {
        let format = DocumentFormat::detect(Some("application/pdf"), "resume.docx");
        assert_eq!(format, Some(DocumentFormat::Pdf));
    }

    #[test]
    fn test_octet_stream_falls_back_to_extension() {
        let format = DocumentFormat::detect(Some("application/octet-stream"), "CV.DOCX");
        assert_eq!(format, Some(DocumentFormat::Docx));
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        assert_eq!(
            DocumentFormat::from_content_type("application/msword; charset=binary"),
            Some(DocumentFormat::Doc)
        );
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let upload = Upload::new("notes.txt", b"hello".to_vec());
        let err = Document::from_upload(upload).unwrap_err();
        assert_eq!(err.reason(), "unsupported-format");
    }

    #[test]
    fn test_extracted_text_normalizes_line_endings() {
        let text = ExtractedText::new("Jane Doe  \r\nEngineer\u{0}\r\n\r\n");
        assert_eq!(text.as_str(), "Jane Doe\nEngineer");
    }

    #[test]
    fn test_extracted_text_keeps_tabs() {
        let text = ExtractedText::new("Python\tSQL");
        assert_eq!(text.as_str(), "Python\tSQL");
    }

    #[test]
    fn test_whitespace_only_text_is_empty() {
        assert!(ExtractedText::new(" \n\t\n").is_empty());
        assert!(ExtractedText::default().is_empty());
    }
}
