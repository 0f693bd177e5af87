//! The four turn handlers and their dispatch.
//!
//! A handler reads the conversation (the new user message is already the
//! last entry) and produces exactly one reply. External failures never
//! escape a handler; they become a degraded reply instead.

pub mod chat;
pub mod image;
pub mod pdf;
pub mod vision;

use switchboard_types::conversation::ConversationState;
use switchboard_types::llm::{self, MessageRole};
use switchboard_types::message::Message;
use switchboard_types::route::Route;

use crate::image::ImageOverrides;

pub use self::chat::ChatHandler;
pub use self::image::ImageHandler;
pub use self::pdf::PdfHandler;
pub use self::vision::VisionHandler;

/// Caller-supplied knobs for a single turn.
#[derive(Debug, Clone, Default)]
pub struct TurnOptions {
    pub image: ImageOverrides,
}

/// A freshly generated image to remember on the thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
    pub prompt: String,
}

/// What a handler hands back to the engine.
#[derive(Debug, Clone)]
pub struct HandlerReply {
    pub message: Message,
    pub generated_image: Option<GeneratedImage>,
}

impl HandlerReply {
    pub fn assistant(route: Route, text: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(text.into()).with_route(route),
            generated_image: None,
        }
    }

    pub fn system(route: Route, text: impl Into<String>) -> Self {
        Self {
            message: Message::system(text.into()).with_route(route),
            generated_image: None,
        }
    }
}

/// All handlers, dispatched by route.
pub struct Handlers {
    pub chat: ChatHandler,
    pub vision: VisionHandler,
    pub pdf: PdfHandler,
    pub image: ImageHandler,
}

impl Handlers {
    pub async fn dispatch(
        &self,
        route: Route,
        state: &ConversationState,
        options: &TurnOptions,
    ) -> HandlerReply {
        match route {
            Route::Chat => self.chat.handle(state).await,
            Route::Vision => self.vision.handle(state).await,
            Route::Pdf => self.pdf.handle(state).await,
            Route::ImageGeneration => self.image.handle(state, options).await,
        }
    }
}

/// Reply used when a model call fails.
pub(crate) fn model_failure_text(err: &switchboard_types::llm::LlmError) -> String {
    format!("⚠️ Sorry, I couldn't get a response from the model right now ({err}). Please try again.")
}

/// Convert stored history to a text-only provider transcript.
pub(crate) fn history_transcript(state: &ConversationState) -> Vec<llm::Message> {
    state
        .messages
        .iter()
        .filter(|m| m.role != MessageRole::Tool)
        .map(|m| llm::Message::new(m.role, m.content.transcript()))
        .collect()
}
