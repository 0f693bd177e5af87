//! OpenTelemetry GenAI Semantic Convention attribute constants.
//!
//! Field names are fixed at span creation (`tracing` requires literal
//! identifiers there), so these constants are used when recording values
//! after the call returns, via `Span::record`.

// --- Required attributes ---

/// The name of the operation being performed (e.g., "chat", "route").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "groq", "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_RESPONSE_MODEL: &str = "gen_ai.response.model";

pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reason for the response (e.g., "end_turn", "tool_use").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";

// --- Operation name values ---

/// Persona chat reply, including tool-loop rounds.
pub const OP_CHAT: &str = "chat";

/// Route classification for an incoming turn.
pub const OP_ROUTE: &str = "route";

/// Image analysis.
pub const OP_VISION: &str = "vision";

/// Question answering over extracted PDF text.
pub const OP_PDF_QA: &str = "pdf_qa";
