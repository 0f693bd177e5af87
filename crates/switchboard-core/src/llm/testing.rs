//! Scripted provider for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use switchboard_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, ToolCall,
    Usage,
};

use super::box_provider::BoxLlmProvider;
use super::provider::LlmProvider;

pub(crate) type RequestLog = Arc<Mutex<Vec<CompletionRequest>>>;

/// Replays queued responses in order and records every request.
pub(crate) struct ScriptedProvider {
    script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    requests: RequestLog,
    capabilities: ProviderCapabilities,
}

impl ScriptedProvider {
    pub(crate) fn boxed(
        script: Vec<Result<CompletionResponse, LlmError>>,
    ) -> (BoxLlmProvider, RequestLog) {
        let requests: RequestLog = Arc::default();
        let provider = Self {
            script: Mutex::new(script.into()),
            requests: requests.clone(),
            capabilities: ProviderCapabilities {
                tool_calling: true,
                vision: true,
                structured_output: true,
                max_context_tokens: 128_000,
                max_output_tokens: 8_192,
            },
        };
        (BoxLlmProvider::new(provider), requests)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Provider {
                    message: "script exhausted".to_string(),
                })
            })
    }
}

pub(crate) fn text(content: &str) -> Result<CompletionResponse, LlmError> {
    Ok(CompletionResponse {
        id: "resp-1".to_string(),
        content: content.to_string(),
        model: "scripted-model".to_string(),
        stop_reason: StopReason::EndTurn,
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
        },
        tool_calls: Vec::new(),
    })
}

pub(crate) fn tool_calls(calls: Vec<ToolCall>) -> Result<CompletionResponse, LlmError> {
    Ok(CompletionResponse {
        id: "resp-tools".to_string(),
        content: String::new(),
        model: "scripted-model".to_string(),
        stop_reason: StopReason::ToolUse,
        usage: Usage::default(),
        tool_calls: calls,
    })
}

pub(crate) fn failure() -> Result<CompletionResponse, LlmError> {
    Err(LlmError::Provider {
        message: "upstream unavailable".to_string(),
    })
}
