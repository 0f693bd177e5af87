//! Configuration loader for Switchboard.
//!
//! Reads `config.toml` (an explicit path, or `{data_dir}/config.toml`) and
//! deserializes it into [`AppConfig`]. Falls back to defaults when the file
//! is missing or malformed. Secrets come from environment variables only.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use thiserror::Error;

use switchboard_types::config::AppConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SWITCHBOARD_DATA_DIR";

/// Errors raised while wiring the service from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingSecret(String),

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("provider setup failed: {0}")]
    Provider(String),
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `SWITCHBOARD_DATA_DIR` environment variable
/// 2. `~/.switchboard`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".switchboard");
    }

    // Last resort: current directory
    PathBuf::from(".switchboard")
}

/// Parse a config file strictly.
///
/// Used by `check-config`, where a malformed file must be reported rather
/// than silently replaced by defaults.
pub async fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load configuration, tolerating a missing or broken file.
///
/// - `path` set: read that file.
/// - `path` unset: read `{data_dir}/config.toml`.
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(path: Option<&Path>, data_dir: &Path) -> AppConfig {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join("config.toml"));

    match tokio::fs::try_exists(&config_path).await {
        Ok(true) => {}
        _ => {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
    }

    match read_config(&config_path).await {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            AppConfig::default()
        }
    }
}

/// Read a secret from the named environment variable.
///
/// Empty values count as unset.
pub fn secret_from_env(name: &str) -> Result<SecretString, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(ConfigError::MissingSecret(name.to_string())),
    }
}
