//! Image analysis on the vision model.

use std::sync::Arc;

use switchboard_observe::genai_attrs::OP_VISION;
use switchboard_types::conversation::ConversationState;
use switchboard_types::llm::{CompletionRequest, Message, MessageRole};
use switchboard_types::message::ContentPart;
use switchboard_types::route::Route;

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::complete_traced;

use super::{HandlerReply, model_failure_text};

pub const DEFAULT_QUESTION: &str = "Please describe this image in detail.";

pub const NO_IMAGE_REPLY: &str =
    "I don't see an image in this conversation yet. Please attach one and ask again.";

const ANALYST_PROMPT: &str = "\
You are a professional image analyst 🖼️.
Examine the provided image carefully and answer the user's question directly.

- Look at visible objects, people, text, environment, and context.
- For a question about an object, explain its features.
- For a question about context, describe relationships and the scene.
- Keep the explanation natural and concise.

If there is no specific question, describe the image: main subjects,
surroundings and background, then colors, style, and mood.";

pub struct VisionHandler {
    provider: Arc<BoxLlmProvider>,
    max_tokens: u32,
}

impl VisionHandler {
    pub fn new(provider: Arc<BoxLlmProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    pub async fn handle(&self, state: &ConversationState) -> HandlerReply {
        let latest = state.last_message().map(|m| &m.content);

        let question = latest
            .and_then(|c| c.first_text())
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUESTION)
            .to_string();

        // An image on this turn wins; otherwise reuse the thread's last image.
        let image_url = latest
            .and_then(|c| c.image_url())
            .or(state.image_url.as_deref())
            .map(str::to_string);

        let Some(image_url) = image_url else {
            return HandlerReply::assistant(Route::Vision, NO_IMAGE_REPLY);
        };

        let request = CompletionRequest::new(
            Some(ANALYST_PROMPT.to_string()),
            vec![Message::new(
                MessageRole::User,
                vec![
                    ContentPart::Text { text: question },
                    ContentPart::ImageUrl { image_url },
                ],
            )],
            self.max_tokens,
        );

        match complete_traced(&self.provider, OP_VISION, &request).await {
            Ok(response) => HandlerReply::assistant(Route::Vision, response.content),
            Err(e) => HandlerReply::assistant(Route::Vision, model_failure_text(&e)),
        }
    }
}
