//! Persona chat with an optional tool loop.

use std::sync::Arc;

use tracing::debug;

use switchboard_observe::genai_attrs::OP_CHAT;
use switchboard_types::conversation::ConversationState;
use switchboard_types::llm::{CompletionRequest, Message};
use switchboard_types::route::Route;

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::complete_traced;
use crate::tool::ToolBox;

use super::{HandlerReply, history_transcript, model_failure_text};

pub const PERSONA_PROMPT: &str = "\
You are Bob 🤖, the user's friendly, helpful assistant.

- Be warm, approachable, and polite.
- Be concise but engaging; avoid a robotic tone.
- Remember earlier messages in this conversation and keep context.
- If the user greets you, greet them back warmly and ask how you can help.
- When you use a tool (Wikipedia, web search), mention it naturally.
- Keep answers clear, well structured, and tailored to the question.";

/// Tool-loop bound when none is configured.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 4;

pub struct ChatHandler {
    provider: Arc<BoxLlmProvider>,
    tools: ToolBox,
    max_tool_rounds: usize,
    max_tokens: u32,
}

impl ChatHandler {
    pub fn new(provider: Arc<BoxLlmProvider>, tools: ToolBox, max_tokens: u32) -> Self {
        Self {
            provider,
            tools,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            max_tokens,
        }
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    fn tools_enabled(&self) -> bool {
        !self.tools.is_empty()
            && self.max_tool_rounds > 0
            && self.provider.capabilities().tool_calling
    }

    pub async fn handle(&self, state: &ConversationState) -> HandlerReply {
        let mut request = CompletionRequest::new(
            Some(PERSONA_PROMPT.to_string()),
            history_transcript(state),
            self.max_tokens,
        );
        if self.tools_enabled() {
            request.tools = self.tools.definitions();
        }

        let mut rounds = 0;
        loop {
            let response = match complete_traced(&self.provider, OP_CHAT, &request).await {
                Ok(response) => response,
                Err(e) => return HandlerReply::assistant(Route::Chat, model_failure_text(&e)),
            };

            if response.tool_calls.is_empty() || request.tools.is_empty() {
                return HandlerReply::assistant(Route::Chat, response.content);
            }

            rounds += 1;
            debug!(round = rounds, calls = response.tool_calls.len(), "executing tool calls");

            request.messages.push(Message::tool_request(
                response.content,
                response.tool_calls.clone(),
            ));
            for call in &response.tool_calls {
                let output = self.tools.execute(call).await;
                request.messages.push(Message::tool_result(call.id.clone(), output));
            }

            // Out of rounds: withhold tools so the next answer is final.
            if rounds >= self.max_tool_rounds {
                request.tools.clear();
            }
        }
    }
}
