//! LlmProvider trait definition.
//!
//! The abstraction every chat-completions backend implements. Uses RPITIT
//! for `complete`; `BoxLlmProvider` adds the object-safe wrapper.

use switchboard_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities,
};

/// Trait for LLM provider backends (Groq, Gemini, OpenAI, ...).
///
/// Implementations live in switchboard-infra (e.g., `OpenAiCompatibleProvider`).
/// Test doubles implement it directly.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "groq", "gemini").
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty.
    fn model(&self) -> &str;

    /// What this provider supports (tool calling, vision, structured output).
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
