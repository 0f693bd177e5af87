//! PDF text extraction port.

use std::sync::Arc;

use switchboard_types::error::PdfError;

/// Text of one page, or the reason it could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number.
    pub number: u32,
    pub text: Result<String, String>,
}

/// Synchronous, CPU-bound extraction. Callers run it on a blocking thread.
pub trait PdfTextExtractor: Send + Sync {
    /// Extract every page. Only whole-document failures are errors.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, PdfError>;
}

/// Extract and join page text off the async runtime.
///
/// Failed pages are replaced inline with a bracketed note.
pub async fn extract_text(
    extractor: Arc<dyn PdfTextExtractor>,
    bytes: Vec<u8>,
) -> Result<String, PdfError> {
    let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&bytes))
        .await
        .map_err(|e| PdfError::Task(e.to_string()))??;

    Ok(pages
        .into_iter()
        .map(|page| match page.text {
            Ok(text) => text,
            Err(reason) => format!(
                "[page {}: text extraction failed: {reason}]",
                page.number
            ),
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
