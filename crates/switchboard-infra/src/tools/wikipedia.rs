//! Encyclopedia lookup via the Wikipedia REST summary endpoint.

use serde::Deserialize;

use switchboard_core::tool::{Tool, required_str};
use switchboard_types::error::ToolError;
use switchboard_types::llm::ToolDefinition;

use super::http_error;

pub const TOOL_NAME: &str = "wikipedia";

/// Returned when no article matches the query.
pub const NO_RESULT: &str = "No good Wikipedia Search Result was found";

#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default, rename = "type")]
    kind: String,
}

pub struct WikipediaLookup {
    client: reqwest::Client,
    base_url: String,
    definition: ToolDefinition,
}

impl WikipediaLookup {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            definition: ToolDefinition {
                name: TOOL_NAME.to_string(),
                description: "Look up a topic on Wikipedia and return a short summary. \
                              Input should be the name of a person, place, or concept."
                    .to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Article title to look up"}
                    },
                    "required": ["query"]
                }),
            },
        }
    }

    fn summary_url(&self, query: &str) -> String {
        // Titles use underscores for spaces.
        let title = query.split_whitespace().collect::<Vec<_>>().join("_");
        format!("{}/page/summary/{}", self.base_url, urlencoding::encode(&title))
    }
}

impl Tool for WikipediaLookup {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
        let query = required_str(TOOL_NAME, arguments, "query")?;

        let response = self
            .client
            .get(self.summary_url(query))
            .send()
            .await
            .map_err(|e| http_error(TOOL_NAME, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(NO_RESULT.to_string());
        }
        if !status.is_success() {
            return Err(ToolError::Execution {
                tool: TOOL_NAME.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        let summary: Summary = response.json().await.map_err(|e| http_error(TOOL_NAME, e))?;
        if summary.extract.trim().is_empty() || summary.kind == "disambiguation" {
            return Ok(NO_RESULT.to_string());
        }
        Ok(format!("Page: {}\nSummary: {}", summary.title, summary.extract))
    }
}
