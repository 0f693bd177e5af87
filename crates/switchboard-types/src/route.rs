//! Routing types: the closed set of handlers and the classifier's decision.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The handler that processes a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// General conversation, Q&A, greetings, search queries.
    #[serde(alias = "chatbot")]
    Chat,
    /// Analysis of an attached image.
    Vision,
    /// Analysis of an attached PDF.
    Pdf,
    /// Generating a new image from a text prompt.
    ImageGeneration,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Chat, Route::Vision, Route::Pdf, Route::ImageGeneration];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Chat => "chat",
            Route::Vision => "vision",
            Route::Pdf => "pdf",
            Route::ImageGeneration => "image_generation",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" | "chatbot" => Ok(Route::Chat),
            "vision" => Ok(Route::Vision),
            "pdf" => Ok(Route::Pdf),
            "image_generation" => Ok(Route::ImageGeneration),
            other => Err(format!("invalid route: '{other}'")),
        }
    }
}

/// Structured output of the route classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RouterDecision {
    /// Node to handle the request.
    pub route: Route,
    /// Short explanation of why this node was chosen.
    pub reasoning: String,
}

/// Where the final route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// The classifier's answer was used as-is.
    Classifier,
    /// An attachment forced a different route than the classifier chose.
    Override,
    /// The classifier failed; the route came from attachment detection alone.
    Fallback,
}

impl fmt::Display for RouteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteSource::Classifier => write!(f, "classifier"),
            RouteSource::Override => write!(f, "override"),
            RouteSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// The router's answer for one turn. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSelection {
    pub route: Route,
    pub source: RouteSource,
    pub reasoning: String,
}

/// Failure of the route classifier. Always recovered by the router's fallback.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier model call failed: {0}")]
    Llm(String),

    #[error("malformed classifier output: {0}")]
    Malformed(String),
}
