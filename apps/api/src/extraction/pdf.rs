use super::types::PdfTextSource;
use super::ExtractionError;

/// PDF text source backed by the pdf-extract crate.
/// Handles digital PDFs with an embedded text layer; scanned pages come back empty.
pub struct PdfExtractText;

impl PdfTextSource for PdfExtractText {
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::Decode(format!("PDF parsing failed: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a single-page PDF with one line of text, using lopdf
    /// (the library pdf-extract reads with).
    pub(crate) fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_extracts_text_from_digital_pdf() {
        let pages = PdfExtractText
            .page_texts(&make_test_pdf("Jane Doe Python Engineer"))
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert!(
            pages[0].contains("Jane") || pages[0].contains("Python"),
            "unexpected page text: {:?}",
            pages[0]
        );
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        let err = PdfExtractText.page_texts(b"not a pdf").unwrap_err();
        assert_eq!(err.reason(), "decode-error");
    }
}
