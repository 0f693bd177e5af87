//! LLM provider abstractions for Switchboard.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `complete_traced`: one model call inside a GenAI span

pub mod box_provider;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;

use tracing::{Instrument, info_span};

use switchboard_observe::genai_attrs::{
    GEN_AI_RESPONSE_FINISH_REASONS, GEN_AI_RESPONSE_ID, GEN_AI_RESPONSE_MODEL,
    GEN_AI_USAGE_INPUT_TOKENS, GEN_AI_USAGE_OUTPUT_TOKENS,
};
use switchboard_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use self::box_provider::BoxLlmProvider;

/// Run one completion inside a `gen_ai.<operation>` span.
///
/// Request attributes are set when the span opens; usage and finish reason
/// are recorded once the provider answers.
pub async fn complete_traced(
    provider: &BoxLlmProvider,
    operation: &'static str,
    request: &CompletionRequest,
) -> Result<CompletionResponse, LlmError> {
    let model = if request.model.is_empty() {
        provider.model()
    } else {
        request.model.as_str()
    };

    let span = info_span!(
        "gen_ai.complete",
        gen_ai.operation.name = operation,
        gen_ai.provider.name = provider.name(),
        gen_ai.request.model = %model,
        gen_ai.request.max_tokens = request.max_tokens,
        gen_ai.request.temperature = ?request.temperature,
        gen_ai.response.model = tracing::field::Empty,
        gen_ai.response.id = tracing::field::Empty,
        gen_ai.response.finish_reasons = tracing::field::Empty,
        gen_ai.usage.input_tokens = tracing::field::Empty,
        gen_ai.usage.output_tokens = tracing::field::Empty,
    );

    let result = provider.complete(request).instrument(span.clone()).await;

    if let Ok(response) = &result {
        span.record(GEN_AI_RESPONSE_MODEL, response.model.as_str());
        span.record(GEN_AI_RESPONSE_ID, response.id.as_str());
        span.record(
            GEN_AI_RESPONSE_FINISH_REASONS,
            response.stop_reason.to_string().as_str(),
        );
        span.record(GEN_AI_USAGE_INPUT_TOKENS, response.usage.input_tokens);
        span.record(GEN_AI_USAGE_OUTPUT_TOKENS, response.usage.output_tokens);
    }

    result
}
