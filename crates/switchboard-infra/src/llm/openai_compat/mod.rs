//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves Groq, Google Gemini and
//! OpenAI from one codebase via configurable base URLs. Requests go to
//! `{base_url}/chat/completions` as plain JSON over reqwest.

pub mod types;

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use secrecy::{ExposeSecret, SecretString};

use switchboard_core::llm::provider::LlmProvider;
use switchboard_types::config::ModelConfig;
use switchboard_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, ProviderCapabilities,
    StopReason, ToolCall, ToolDefinition, Usage,
};
use switchboard_types::message::{ContentPart, MessageContent};

use self::types::{
    ChatRequest, ChatResponse, ErrorEnvelope, ResponseFormat, ResponseJsonSchema, WireContent,
    WireFunction, WireFunctionCall, WireImageUrl, WireMessage, WirePart, WireTool, WireToolCall,
};

/// Unified provider for any OpenAI-compatible chat-completions API.
///
/// # API Key Security
///
/// The key is held as a [`SecretString`] and only exposed while building the
/// `Authorization` header. The type does not implement `Debug`.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: SecretString,
    provider_name: String,
    base_url: String,
    model: String,
    temperature: Option<f64>,
    capabilities: ProviderCapabilities,
}

impl OpenAiCompatibleProvider {
    /// Build a provider from one `[text_model]`/`[vision_model]` section.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidRequest`] if the HTTP client cannot be built.
    pub fn from_config(config: &ModelConfig, api_key: SecretString) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            provider_name: config.provider_name.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            capabilities: Self::capabilities_for_provider(&config.provider_name),
        })
    }

    /// Determine capabilities from the provider name.
    ///
    /// Groq's Llama deployments do not reliably honour `json_schema`
    /// response formats, so the route classifier falls back to prompting
    /// for JSON there.
    fn capabilities_for_provider(provider_name: &str) -> ProviderCapabilities {
        match provider_name {
            "gemini" => ProviderCapabilities {
                tool_calling: true,
                vision: true,
                structured_output: true,
                max_context_tokens: 1_000_000,
                max_output_tokens: 65_536,
            },
            "openai" => ProviderCapabilities {
                tool_calling: true,
                vision: true,
                structured_output: true,
                max_context_tokens: 128_000,
                max_output_tokens: 16_384,
            },
            "groq" => ProviderCapabilities {
                tool_calling: true,
                vision: false,
                structured_output: false,
                max_context_tokens: 128_000,
                max_output_tokens: 32_768,
            },
            // Conservative defaults for unknown endpoints
            _ => ProviderCapabilities {
                tool_calling: true,
                vision: true,
                structured_output: false,
                max_context_tokens: 32_000,
                max_output_tokens: 4_096,
            },
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Convert a generic [`CompletionRequest`] into the wire request.
    fn build_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(WireMessage {
                role: "system",
                content: Some(WireContent::Text(system.clone())),
                tool_calls: Vec::new(),
                tool_call_id: None,
            });
        }
        messages.extend(request.messages.iter().map(to_wire_message));

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        ChatRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature.or(self.temperature),
            tools: request.tools.iter().map(to_wire_tool).collect(),
            response_format: request.output_config.as_ref().map(|config| ResponseFormat {
                kind: config.format.type_field.clone(),
                json_schema: ResponseJsonSchema {
                    name: config.format.json_schema.name.clone(),
                    schema: config.format.json_schema.schema.clone(),
                    strict: config.format.json_schema.strict,
                },
            }),
        }
    }
}

fn role_str(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    }
}

fn to_wire_message(message: &Message) -> WireMessage {
    let content = match &message.content {
        MessageContent::Text(text) if text.is_empty() && !message.tool_calls.is_empty() => None,
        MessageContent::Text(text) => Some(WireContent::Text(text.clone())),
        MessageContent::Parts(parts) => Some(WireContent::Parts(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => WirePart::Text { text: text.clone() },
                    ContentPart::ImageUrl { image_url } => WirePart::ImageUrl {
                        image_url: WireImageUrl {
                            url: image_url.clone(),
                        },
                    },
                    // PDF bytes are extracted upstream; never ship the binary.
                    ContentPart::Pdf { .. } => WirePart::Text {
                        text: "[PDF attachment]".to_string(),
                    },
                })
                .collect(),
        )),
    };

    WireMessage {
        role: role_str(message.role),
        content,
        tool_calls: message
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: call.id.clone(),
                kind: "function".to_string(),
                function: WireFunctionCall {
                    name: call.name.clone(),
                    arguments: call.arguments.to_string(),
                },
            })
            .collect(),
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn to_wire_tool(tool: &ToolDefinition) -> WireTool {
    WireTool {
        kind: "function",
        function: WireFunction {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: tool.parameters.clone(),
        },
    }
}

fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("tool_calls") | Some("function_call") => StopReason::ToolUse,
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        _ => StopReason::EndTurn,
    }
}

/// Arguments arrive as a JSON string; malformed JSON is passed through as a
/// string value so the tool reports it instead of the whole turn failing.
fn parse_tool_call(call: WireToolCall) -> ToolCall {
    let arguments = serde_json::from_str(&call.function.arguments)
        .unwrap_or(serde_json::Value::String(call.function.arguments));
    ToolCall {
        id: call.id,
        name: call.function.name,
        arguments,
    }
}

fn map_error_status(status: StatusCode, retry_after: Option<u64>, body: String) -> LlmError {
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: retry_after.map(|secs| secs * 1000),
        },
        503 | 529 => LlmError::Overloaded(message),
        400 | 404 | 422 => LlmError::InvalidRequest(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Provider {
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, retry_after, error_body));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Deserialization(format!("failed to parse response: {e}"))
            }
        })?;

        let usage = chat.usage.unwrap_or_default();
        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Deserialization("response has no choices".to_string()))?;

        Ok(CompletionResponse {
            id: chat.id,
            content: choice.message.content.unwrap_or_default(),
            model: if chat.model.is_empty() {
                body.model
            } else {
                chat.model
            },
            stop_reason: map_finish_reason(choice.finish_reason.as_deref()),
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
            tool_calls: choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(parse_tool_call)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchboard_types::llm::OutputConfig;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer, provider_name: &str) -> OpenAiCompatibleProvider {
        let config = ModelConfig {
            provider_name: provider_name.to_string(),
            base_url: format!("{}/v1/", server.uri()),
            api_key_env: "TEST_KEY".to_string(),
            model: "test-model".to_string(),
            temperature: Some(0.6),
            max_tokens: 512,
            timeout_secs: 5,
        };
        OpenAiCompatibleProvider::from_config(&config, SecretString::from("sk-test".to_string()))
            .unwrap()
    }

    fn sample_response() -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "model": "test-model-0125",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello there!"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        })
    }

    fn user_request(text: &str) -> CompletionRequest {
        CompletionRequest::new(
            Some("Be brief.".to_string()),
            vec![Message::new(MessageRole::User, text)],
            256,
        )
    }

    #[tokio::test]
    async fn test_complete_sends_bearer_and_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "max_tokens": 256,
                "temperature": 0.6,
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, "groq");
        let response = provider.complete(&user_request("hi")).await.unwrap();

        assert_eq!(response.id, "chatcmpl-1");
        assert_eq!(response.content, "Hello there!");
        assert_eq!(response.model, "test-model-0125");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 3);
        assert!(response.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_request_temperature_overrides_configured_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"temperature": 0.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, "groq");
        let mut request = user_request("route this");
        request.temperature = Some(0.0);
        provider.complete(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_image_parts_use_image_url_objects() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "messages": [
                    {"role": "system"},
                    {"role": "user", "content": [
                        {"type": "text", "text": "What is this?"},
                        {"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}}
                    ]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, "gemini");
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "What is this?".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: "https://example.com/cat.png".to_string(),
            },
        ]);
        let request = CompletionRequest::new(
            Some("Describe images.".to_string()),
            vec![Message::new(MessageRole::User, content)],
            256,
        );
        provider.complete(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_tool_calls_roundtrip() {
        let server = MockServer::start().await;
        let body = json!({
            "id": "chatcmpl-2",
            "model": "test-model",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "wikipedia", "arguments": "{\"query\":\"Rust\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "tools": [{"type": "function", "function": {"name": "wikipedia"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, "groq");
        let mut request = user_request("Tell me about Rust");
        request.tools = vec![ToolDefinition {
            name: "wikipedia".to_string(),
            description: "Look up a topic".to_string(),
            parameters: json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        }];
        let response = provider.complete(&request).await.unwrap();

        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.content, "");
        assert_eq!(
            response.tool_calls,
            vec![ToolCall {
                id: "call_1".to_string(),
                name: "wikipedia".to_string(),
                arguments: json!({"query": "Rust"}),
            }]
        );
        // No usage block in the body.
        assert_eq!(response.usage.input_tokens, 0);
    }

    #[test]
    fn test_replayed_tool_turns_serialize_as_openai_expects() {
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "web_search".to_string(),
            arguments: json!({"query": "weather"}),
        };
        let assistant = to_wire_message(&Message::tool_request(String::new(), vec![call]));
        let json = serde_json::to_value(&assistant).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json["content"].is_null());
        assert_eq!(json["tool_calls"][0]["type"], "function");
        assert_eq!(json["tool_calls"][0]["function"]["arguments"], "{\"query\":\"weather\"}");

        let result = to_wire_message(&Message::tool_result("call_1", "Sunny"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_1");
        assert_eq!(json["content"], "Sunny");
    }

    #[test]
    fn test_pdf_parts_are_never_sent_as_bytes() {
        let message = Message::new(
            MessageRole::User,
            MessageContent::Parts(vec![ContentPart::Pdf {
                data: b"%PDF-1.7 secret".to_vec(),
                filename: Some("report.pdf".to_string()),
            }]),
        );
        let json = serde_json::to_string(&to_wire_message(&message)).unwrap();
        assert!(json.contains("[PDF attachment]"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_output_config_maps_to_response_format() {
        let config = ModelConfig::default_vision();
        let provider =
            OpenAiCompatibleProvider::from_config(&config, SecretString::from("k".to_string()))
                .unwrap();
        let mut request = user_request("classify");
        request.output_config = Some(OutputConfig::json_schema(
            "RouterDecision",
            json!({"type": "object"}),
        ));
        let wire = serde_json::to_value(provider.build_request(&request)).unwrap();
        assert_eq!(wire["response_format"]["type"], "json_schema");
        assert_eq!(wire["response_format"]["json_schema"]["name"], "RouterDecision");
        assert_eq!(wire["response_format"]["json_schema"]["strict"], true);
        assert_eq!(wire["model"], "gemini-2.5-flash");
        assert!(wire.get("tools").is_none());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_json(json!({"error": {"message": "slow down"}})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"message": "model not found"}})),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server, "groq");
        let request = user_request("hi");

        match provider.complete(&request).await {
            Err(LlmError::RateLimited { retry_after_ms }) => assert_eq!(retry_after_ms, Some(7000)),
            other => panic!("expected RateLimited, got {other:?}"),
        }
        assert!(matches!(
            provider.complete(&request).await,
            Err(LlmError::AuthenticationFailed)
        ));
        match provider.complete(&request).await {
            Err(LlmError::InvalidRequest(message)) => assert_eq!(message, "model not found"),
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_overloaded_and_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let provider = provider_for(&server, "groq");
        let request = user_request("hi");
        assert!(matches!(
            provider.complete(&request).await,
            Err(LlmError::Overloaded(_))
        ));
        assert!(matches!(
            provider.complete(&request).await,
            Err(LlmError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(sample_response())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut provider = provider_for(&server, "groq");
        provider.client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        assert!(matches!(
            provider.complete(&user_request("hi")).await,
            Err(LlmError::Timeout)
        ));
    }

    #[test]
    fn test_capabilities_by_provider() {
        let groq = OpenAiCompatibleProvider::capabilities_for_provider("groq");
        assert!(groq.tool_calling);
        assert!(!groq.structured_output);
        let gemini = OpenAiCompatibleProvider::capabilities_for_provider("gemini");
        assert!(gemini.vision);
        assert!(gemini.structured_output);
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(map_finish_reason(Some("stop")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(Some("length")), StopReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("tool_calls")), StopReason::ToolUse);
        assert_eq!(map_finish_reason(Some("content_filter")), StopReason::ContentFilter);
        assert_eq!(map_finish_reason(None), StopReason::EndTurn);
    }
}
