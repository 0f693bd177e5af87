//! Question answering over an uploaded PDF.

use std::sync::Arc;

use tracing::warn;

use switchboard_observe::genai_attrs::OP_PDF_QA;
use switchboard_types::conversation::ConversationState;
use switchboard_types::llm::{CompletionRequest, Message, MessageRole};
use switchboard_types::route::Route;

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::complete_traced;
use crate::pdf::{PdfTextExtractor, extract_text};
use crate::router::context::truncate_chars;

use super::{HandlerReply, model_failure_text};

pub const NO_PDF_REPLY: &str = "⚠️ No PDF content provided. Please upload a valid PDF file.";

pub const DEFAULT_QUERY: &str = "Summarize the PDF in detail.";

pub const DEFAULT_MAX_CHARS: usize = 4000;

const PDF_ASSISTANT_PROMPT: &str = "\
You are a smart PDF assistant 📄.
Read the extracted PDF text carefully and answer so that you:

1. Directly address the user's query.
2. Use bullet points, short paragraphs, or numbered lists.
3. Highlight key points, main ideas, and important details.
4. Keep a natural, friendly, professional tone.

If the PDF is long, summarize only the sections relevant to the query.
If the user gives no query, write a concise summary of the whole document.";

pub struct PdfHandler {
    provider: Arc<BoxLlmProvider>,
    extractor: Arc<dyn PdfTextExtractor>,
    max_chars: usize,
    max_tokens: u32,
}

impl PdfHandler {
    pub fn new(
        provider: Arc<BoxLlmProvider>,
        extractor: Arc<dyn PdfTextExtractor>,
        max_chars: usize,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            extractor,
            max_chars,
            max_tokens,
        }
    }

    pub async fn handle(&self, state: &ConversationState) -> HandlerReply {
        let Some(latest) = state.last_message() else {
            return HandlerReply::system(Route::Pdf, NO_PDF_REPLY);
        };
        let payload = match latest.content.pdf() {
            Some(bytes) if !bytes.is_empty() => bytes.to_vec(),
            _ => return HandlerReply::system(Route::Pdf, NO_PDF_REPLY),
        };

        let query = latest.content.text();
        let query = match query.trim() {
            "" => DEFAULT_QUERY,
            q => q,
        };

        let extracted = match extract_text(self.extractor.clone(), payload).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "PDF text extraction failed");
                format!("⚠️ Error reading PDF: {e}")
            }
        };
        let excerpt = truncate_chars(&extracted, self.max_chars);

        let prompt = format!(
            "📄 Extracted PDF content (truncated for analysis):\n{excerpt}\n\n❓ User query: {query}"
        );
        let request = CompletionRequest::new(
            Some(PDF_ASSISTANT_PROMPT.to_string()),
            vec![Message::new(MessageRole::User, prompt)],
            self.max_tokens,
        );

        match complete_traced(&self.provider, OP_PDF_QA, &request).await {
            Ok(response) => HandlerReply::assistant(Route::Pdf, response.content),
            Err(e) => HandlerReply::assistant(Route::Pdf, model_failure_text(&e)),
        }
    }
}
