//! PDF text extraction backed by `lopdf`.

use lopdf::Document;

use switchboard_core::pdf::{PageText, PdfTextExtractor};
use switchboard_types::error::PdfError;

/// Pure-Rust extractor. Pages are returned in document order.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PdfTextExtractor for LopdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, PdfError> {
        if bytes.is_empty() {
            return Err(PdfError::Empty);
        }

        let document = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;
        if document.is_encrypted() {
            return Err(PdfError::Parse("document is encrypted".to_string()));
        }

        // get_pages is a BTreeMap keyed by 1-based page number.
        let pages = document
            .get_pages()
            .into_keys()
            .map(|number| PageText {
                number,
                text: document
                    .extract_text(&[number])
                    .map(|text| text.trim_end().to_string())
                    .map_err(|e| e.to_string()),
            })
            .collect();

        Ok(pages)
    }
}
