//! Route classification: the `RouteClassifier` port and its LLM implementation.

use std::sync::Arc;

use switchboard_observe::genai_attrs::OP_ROUTE;
use switchboard_types::llm::{CompletionRequest, Message, MessageRole, OutputConfig};
use switchboard_types::route::{ClassifierError, RouterDecision};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::complete_traced;

/// What the classifier sees for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierInput {
    /// Latest message text with attachment markers.
    pub message_text: String,
    /// Output of [`super::context::recent_context`].
    pub history: String,
}

/// Picks a route for a turn.
///
/// Failures are returned, never panicked; the router turns them into a
/// deterministic fallback.
pub trait RouteClassifier: Send + Sync {
    fn classify(
        &self,
        input: &ClassifierInput,
    ) -> impl std::future::Future<Output = Result<RouterDecision, ClassifierError>> + Send;
}

const ROUTER_SYSTEM_PROMPT: &str = "\
You are a routing assistant. Read the user's message and decide which node should handle it.

PRIORITIES:
1. If [IMAGE_ATTACHED] is present, route to 'vision'.
2. If [PDF_ATTACHED] is present, route to 'pdf'.
3. If the user wants to create, generate, or draw an image, route to 'image_generation'.
4. Everything else (greetings, questions, explanations, search requests) goes to 'chat'.

NODES:
- 'chat': general conversation, Q&A, greetings, explanations, web lookups
- 'vision': analyze an uploaded image (only with [IMAGE_ATTACHED])
- 'pdf': analyze an uploaded PDF (only with [PDF_ATTACHED])
- 'image_generation': produce a new image from a text description

EXAMPLES:
- 'Hello' -> chat
- 'What is Rust?' -> chat
- 'Search for the latest news' -> chat
- 'Generate an image of a sunset' -> image_generation
- 'What is in this picture? [IMAGE_ATTACHED]' -> vision
- 'Summarize this [PDF_ATTACHED]' -> pdf

Default to 'chat' unless there is a clear reason for another node.
Respond with a JSON object containing 'route' and 'reasoning'.";

/// Classifier backed by the text model with JSON-schema structured output.
pub struct LlmRouteClassifier {
    provider: Arc<BoxLlmProvider>,
    max_tokens: u32,
}

impl LlmRouteClassifier {
    pub fn new(provider: Arc<BoxLlmProvider>) -> Self {
        Self {
            provider,
            max_tokens: 256,
        }
    }

    /// JSON schema for `RouterDecision`, closed against extra properties.
    pub fn decision_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(RouterDecision);
        let mut value = serde_json::to_value(schema).unwrap_or_default();
        close_objects(&mut value);
        value
    }

    fn build_request(&self, input: &ClassifierInput) -> CompletionRequest {
        let user = format!(
            "Recent conversation:\n{}\n\nCurrent message:\n{}\n\nWhich node should handle this?",
            input.history, input.message_text
        );
        let mut request = CompletionRequest::new(
            Some(ROUTER_SYSTEM_PROMPT.to_string()),
            vec![Message::new(MessageRole::User, user)],
            self.max_tokens,
        );
        request.temperature = Some(0.0);
        if self.provider.capabilities().structured_output {
            request.output_config = Some(OutputConfig::json_schema(
                "RouterDecision",
                Self::decision_schema(),
            ));
        }
        request
    }
}

impl RouteClassifier for LlmRouteClassifier {
    async fn classify(&self, input: &ClassifierInput) -> Result<RouterDecision, ClassifierError> {
        let request = self.build_request(input);
        let response = complete_traced(&self.provider, OP_ROUTE, &request)
            .await
            .map_err(|e| ClassifierError::Llm(e.to_string()))?;
        parse_decision(&response.content)
    }
}

/// Parse model output into a decision, tolerating a Markdown code fence.
pub fn parse_decision(raw: &str) -> Result<RouterDecision, ClassifierError> {
    let body = strip_code_fence(raw);
    serde_json::from_str::<RouterDecision>(body).map_err(|e| {
        ClassifierError::Malformed(format!("{e}; raw content: {}", raw.trim()))
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Set `additionalProperties: false` on every object schema.
fn close_objects(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if map.get("type").and_then(|t| t.as_str()) == Some("object") {
                map.insert(
                    "additionalProperties".to_string(),
                    serde_json::Value::Bool(false),
                );
            }
            for child in map.values_mut() {
                close_objects(child);
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}
