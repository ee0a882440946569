use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::types::DocConverter;
use super::ExtractionError;

/// Converts legacy `.doc` files to PDF by shelling out to LibreOffice.
///
/// Every call works inside its own `TempDir` (input file, output PDF and a private
/// LibreOffice profile), so concurrent conversions never share a path and the
/// directory is removed when the call returns, whichever way it returns.
pub struct SofficeConverter {
    binary: PathBuf,
}

impl SofficeConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl DocConverter for SofficeConverter {
    async fn to_pdf(&self, doc_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, ExtractionError> {
        let workdir = tempfile::Builder::new()
            .prefix("resume-convert-")
            .tempdir()
            .map_err(|e| ExtractionError::Conversion(format!("cannot create temp dir: {e}")))?;

        let input = workdir.path().join("input.doc");
        tokio::fs::write(&input, doc_bytes)
            .await
            .map_err(|e| ExtractionError::Conversion(format!("cannot stage input: {e}")))?;

        let profile = format!(
            "-env:UserInstallation=file://{}",
            workdir.path().join("profile").display()
        );

        let child = Command::new(&self.binary)
            .arg("--headless")
            .arg(profile)
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(workdir.path())
            .arg(&input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Converter '{}' not found", self.binary.display());
                return Err(ExtractionError::UnsupportedFormat(format!(
                    "legacy .doc needs '{}', which is not installed",
                    self.binary.display()
                )));
            }
            Err(e) => {
                return Err(ExtractionError::Conversion(format!(
                    "failed to start '{}': {e}",
                    self.binary.display()
                )))
            }
        };

        // Dropping the future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ExtractionError::Conversion(format!("converter I/O error: {e}")))
            }
            Err(_) => return Err(ExtractionError::Timeout(timeout)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Conversion(format!(
                "converter exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let pdf_path = workdir.path().join("input.pdf");
        let pdf = tokio::fs::read(&pdf_path).await.map_err(|e| {
            ExtractionError::Conversion(format!("converter produced no PDF: {e}"))
        })?;

        debug!(bytes = pdf.len(), "Converted legacy .doc to PDF");
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_unsupported_format() {
        let converter = SofficeConverter::new("/nonexistent/bin/soffice-for-tests");
        let err = converter
            .to_pdf(b"\xD0\xCF\x11\xE0", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unsupported-format");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_converter_is_conversion_error() {
        // `false` exists on every unix and exits non-zero without writing a PDF.
        let converter = SofficeConverter::new("false");
        let err = converter
            .to_pdf(b"\xD0\xCF\x11\xE0", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "conversion-error");
    }
}
