//! Service configuration types for Switchboard.
//!
//! `AppConfig` represents the top-level `config.toml`. Every section and
//! field has a default, so an empty file (or no file at all) yields a
//! working configuration. Secrets are never stored here: only the names of
//! the environment variables that hold them.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Switchboard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "ModelConfig::default_text")]
    pub text_model: ModelConfig,
    #[serde(default = "ModelConfig::default_vision")]
    pub vision_model: ModelConfig,
    #[serde(default)]
    pub image_generation: ImageGenerationConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
    #[serde(default)]
    pub conversations: ConversationConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            text_model: ModelConfig::default_text(),
            vision_model: ModelConfig::default_vision(),
            image_generation: ImageGenerationConfig::default(),
            pdf: PdfConfig::default(),
            conversations: ConversationConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Request body limit, sized for PDF uploads.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite URL. When absent, `<data_dir>/switchboard.db` is used.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding the HS256 signing secret.
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    /// Require a bearer token on conversation endpoints.
    #[serde(default)]
    pub protect_conversations: bool,
}

fn default_jwt_secret_env() -> String {
    "SWITCHBOARD_JWT_SECRET".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_ttl_minutes: default_token_ttl_minutes(),
            protect_conversations: false,
        }
    }
}

/// One OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider_name: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_model_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_model_timeout_secs() -> u64 {
    120
}

impl ModelConfig {
    /// Groq-hosted Llama for chat, routing, and PDF questions.
    pub fn default_text() -> Self {
        Self {
            provider_name: "groq".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: None,
            max_tokens: default_max_tokens(),
            timeout_secs: default_model_timeout_secs(),
        }
    }

    /// Gemini via its OpenAI-compatible endpoint for image analysis.
    pub fn default_vision() -> Self {
        Self {
            provider_name: "gemini".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: Some(0.6),
            max_tokens: default_max_tokens(),
            timeout_secs: default_model_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationConfig {
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_size")]
    pub width: u32,
    #[serde(default = "default_image_size")]
    pub height: u32,
    #[serde(default = "default_image_seed")]
    pub seed: u64,
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_image_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_image_base_url() -> String {
    "https://pollinations.ai/p".to_string()
}

fn default_image_size() -> u32 {
    512
}

fn default_image_seed() -> u64 {
    42
}

fn default_image_model() -> String {
    "flux".to_string()
}

fn default_image_timeout_secs() -> u64 {
    10
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_image_base_url(),
            width: default_image_size(),
            height: default_image_size(),
            seed: default_image_seed(),
            model: default_image_model(),
            timeout_secs: default_image_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Extracted text beyond this many characters is dropped.
    #[serde(default = "default_pdf_max_chars")]
    pub max_chars: usize,
}

fn default_pdf_max_chars() -> usize {
    4000
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_chars: default_pdf_max_chars(),
        }
    }
}

/// Retention policy for the in-memory conversation store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

fn default_max_threads() -> usize {
    10_000
}

fn default_idle_ttl_secs() -> u64 {
    24 * 60 * 60
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_threads: default_max_threads(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upper bound on model/tool round trips per chat turn.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_wikipedia_base_url")]
    pub wikipedia_base_url: String,
    #[serde(default = "default_duckduckgo_base_url")]
    pub duckduckgo_base_url: String,
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_max_rounds() -> usize {
    4
}

fn default_wikipedia_base_url() -> String {
    "https://en.wikipedia.org/api/rest_v1".to_string()
}

fn default_duckduckgo_base_url() -> String {
    "https://api.duckduckgo.com".to_string()
}

fn default_tool_timeout_secs() -> u64 {
    10
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_rounds: default_max_rounds(),
            wikipedia_base_url: default_wikipedia_base_url(),
            duckduckgo_base_url: default_duckduckgo_base_url(),
            timeout_secs: default_tool_timeout_secs(),
        }
    }
}
