//! LLM provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait
//! defined in `switchboard-core`, plus a factory that resolves the API key
//! from the environment and returns a boxed provider.
//!
//! [`LlmProvider`]: switchboard_core::llm::provider::LlmProvider

pub mod openai_compat;

use switchboard_core::llm::box_provider::BoxLlmProvider;
use switchboard_types::config::ModelConfig;

use crate::config::{ConfigError, secret_from_env};

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from a model section of the config.
///
/// # Errors
///
/// Returns [`ConfigError::MissingSecret`] when the API key variable is unset
/// or [`ConfigError::Provider`] when the HTTP client cannot be built.
pub fn create_provider(config: &ModelConfig) -> Result<BoxLlmProvider, ConfigError> {
    let api_key = secret_from_env(&config.api_key_env)?;
    let provider = OpenAiCompatibleProvider::from_config(config, api_key)
        .map_err(|e| ConfigError::Provider(e.to_string()))?;
    Ok(BoxLlmProvider::new(provider))
}
