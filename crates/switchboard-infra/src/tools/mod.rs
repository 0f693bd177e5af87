//! HTTP-backed chat tools.
//!
//! Both tools implement [`switchboard_core::tool::Tool`] and share one
//! reqwest client configured from `[tools]`.

pub mod duckduckgo;
pub mod wikipedia;

use std::time::Duration;

use switchboard_core::tool::{BoxTool, ToolBox};
use switchboard_types::config::ToolsConfig;
use switchboard_types::error::ToolError;

use self::duckduckgo::DuckDuckGoSearch;
use self::wikipedia::WikipediaLookup;

/// Build the tool set offered to the chat model.
///
/// Returns an empty [`ToolBox`] when tools are disabled.
pub fn build_toolbox(config: &ToolsConfig) -> Result<ToolBox, ToolError> {
    if !config.enabled {
        return Ok(ToolBox::default());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ToolError::Execution {
            tool: "http".to_string(),
            message: format!("failed to build HTTP client: {e}"),
        })?;

    Ok(ToolBox::new(vec![
        BoxTool::new(DuckDuckGoSearch::new(
            client.clone(),
            &config.duckduckgo_base_url,
        )),
        BoxTool::new(WikipediaLookup::new(client, &config.wikipedia_base_url)),
    ]))
}

/// Map a transport failure to a tool error the model can read.
pub(crate) fn http_error(tool: &str, err: reqwest::Error) -> ToolError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    ToolError::Execution {
        tool: tool.to_string(),
        message,
    }
}
