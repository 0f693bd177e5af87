//! Web search via the DuckDuckGo Instant Answer API.
//!
//! The API answers with an abstract for well-known topics plus a list of
//! related topics (possibly grouped). Results are flattened into
//! `snippet: ..., title: ..., link: ...` entries for the model.

use serde::Deserialize;

use switchboard_core::tool::{Tool, required_str};
use switchboard_types::error::ToolError;
use switchboard_types::llm::ToolDefinition;

use super::http_error;

pub const TOOL_NAME: &str = "web_search";

const MAX_RESULTS: usize = 5;

pub const NO_RESULTS: &str = "No good DuckDuckGo Search Result was found";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Result {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

fn flatten<'a>(topics: &'a [RelatedTopic], out: &mut Vec<(&'a str, &'a str)>) {
    for topic in topics {
        if out.len() >= MAX_RESULTS {
            return;
        }
        match topic {
            RelatedTopic::Result { text, first_url } => out.push((text, first_url)),
            RelatedTopic::Group { topics } => flatten(topics, out),
        }
    }
}

fn render(answer: &InstantAnswer) -> String {
    let mut entries = Vec::new();
    if !answer.abstract_text.trim().is_empty() {
        entries.push(format!(
            "snippet: {}, title: {}, link: {}",
            answer.abstract_text, answer.heading, answer.abstract_url
        ));
    }

    let mut related = Vec::new();
    flatten(&answer.related_topics, &mut related);
    for (text, url) in related.into_iter().take(MAX_RESULTS - entries.len()) {
        // The title is the leading part of the text up to the first " - ".
        let title = text.split(" - ").next().unwrap_or(text);
        entries.push(format!("snippet: {text}, title: {title}, link: {url}"));
    }

    if entries.is_empty() {
        NO_RESULTS.to_string()
    } else {
        entries
            .into_iter()
            .map(|entry| format!("[{entry}]"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
    definition: ToolDefinition,
}

impl DuckDuckGoSearch {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            definition: ToolDefinition {
                name: TOOL_NAME.to_string(),
                description: "Search the web with DuckDuckGo. Useful for current events \
                              and facts. Input should be a search query."
                    .to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search query"}
                    },
                    "required": ["query"]
                }),
            },
        }
    }
}

impl Tool for DuckDuckGoSearch {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
        let query = required_str(TOOL_NAME, arguments, "query")?;

        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| http_error(TOOL_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Execution {
                tool: TOOL_NAME.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        // Served as application/x-javascript, so parse the text ourselves.
        let body = response.text().await.map_err(|e| http_error(TOOL_NAME, e))?;
        let answer: InstantAnswer =
            serde_json::from_str(&body).map_err(|e| ToolError::Execution {
                tool: TOOL_NAME.to_string(),
                message: format!("unexpected response: {e}"),
            })?;

        Ok(render(&answer))
    }
}
