//! Text-to-image generation.

use tracing::warn;

use switchboard_types::conversation::ConversationState;
use switchboard_types::route::Route;

use crate::image::{BoxImageGenerator, ImageOptions};

use super::{GeneratedImage, HandlerReply, TurnOptions};

pub const DEFAULT_PROMPT: &str = "A random artwork";

const PROMPT_PREFIX: &str = "generate image:";

pub struct ImageHandler {
    generator: BoxImageGenerator,
    defaults: ImageOptions,
}

impl ImageHandler {
    pub fn new(generator: BoxImageGenerator, defaults: ImageOptions) -> Self {
        Self {
            generator,
            defaults,
        }
    }

    pub async fn handle(&self, state: &ConversationState, options: &TurnOptions) -> HandlerReply {
        let raw = state
            .last_message()
            .map(|m| m.content.text())
            .unwrap_or_default();
        let prompt = extract_prompt(&raw);
        let options = options.image.resolve(&self.defaults);

        match self.generator.generate(&prompt, &options).await {
            Ok(url) => {
                let text = format!("🖼️ Here's your image for **'{prompt}'**:\n{url}");
                let mut reply = HandlerReply::assistant(Route::ImageGeneration, text);
                reply.generated_image = Some(GeneratedImage { url, prompt });
                reply
            }
            Err(e) => {
                warn!(error = %e, "image generation failed");
                HandlerReply::assistant(
                    Route::ImageGeneration,
                    format!("⚠️ Image generation failed: {e}"),
                )
            }
        }
    }
}

/// Prompt text with any leading `generate image:` removed.
pub fn extract_prompt(raw: &str) -> String {
    let trimmed = raw.trim();
    let body = match trimmed.get(..PROMPT_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PROMPT_PREFIX) => trimmed[PROMPT_PREFIX.len()..].trim(),
        _ => trimmed,
    };
    if body.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        body.to_string()
    }
}
