//! Tools the chat handler can offer to the model.
//!
//! `Tool` is the RPITIT port implemented in switchboard-infra; `BoxTool`
//! erases it and `ToolBox` dispatches model tool calls by name.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use switchboard_types::error::ToolError;
use switchboard_types::llm::{ToolCall, ToolDefinition};

/// A function the chat model may call.
pub trait Tool: Send + Sync {
    /// Schema advertised to the model. `definition().name` is the dispatch key.
    fn definition(&self) -> &ToolDefinition;

    /// Run the tool with the model-supplied JSON arguments.
    fn call(
        &self,
        arguments: &serde_json::Value,
    ) -> impl Future<Output = Result<String, ToolError>> + Send;
}

/// Object-safe version of [`Tool`] with boxed futures.
pub trait ToolDyn: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    fn call_boxed<'a>(
        &'a self,
        arguments: &'a serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>>;
}

impl<T: Tool> ToolDyn for T {
    fn definition(&self) -> &ToolDefinition {
        Tool::definition(self)
    }

    fn call_boxed<'a>(
        &'a self,
        arguments: &'a serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>> {
        Box::pin(self.call(arguments))
    }
}

/// Type-erased tool.
pub struct BoxTool {
    inner: Box<dyn ToolDyn>,
}

impl BoxTool {
    pub fn new<T: Tool + 'static>(tool: T) -> Self {
        Self {
            inner: Box::new(tool),
        }
    }

    pub fn definition(&self) -> &ToolDefinition {
        self.inner.definition()
    }

    pub fn name(&self) -> &str {
        &self.inner.definition().name
    }

    pub async fn call(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
        self.inner.call_boxed(arguments).await
    }
}

/// The set of tools offered on a chat turn.
#[derive(Default)]
pub struct ToolBox {
    tools: Vec<BoxTool>,
}

impl ToolBox {
    pub fn new(tools: Vec<BoxTool>) -> Self {
        Self { tools }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition().clone()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&BoxTool, ToolError> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Execute one call. Failures become the result text the model sees.
    pub async fn execute(&self, call: &ToolCall) -> String {
        let result = match self.get(&call.name) {
            Ok(tool) => tool.call(&call.arguments).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(output) => {
                debug!(tool = %call.name, bytes = output.len(), "tool call succeeded");
                output
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool call failed");
                format!("Error: {e}")
            }
        }
    }
}

/// Read a required string argument from a tool-call arguments object.
pub fn required_str<'a>(
    tool: &str,
    arguments: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, ToolError> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: format!("missing string argument '{key}'"),
        })
}


#[cfg(test)]
mod tests {
    use super::testing::EchoTool;
    use super::*;

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_name() {
        let tools = ToolBox::new(vec![
            BoxTool::new(EchoTool::new("wikipedia")),
            BoxTool::new(EchoTool::new("web_search")),
        ]);
        let out = tools
            .execute(&call("web_search", serde_json::json!({"query": "rust"})))
            .await;
        assert_eq!(out, "web_search: rust");
        assert_eq!(tools.definitions().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_text() {
        let tools = ToolBox::new(vec![BoxTool::new(EchoTool::new("wikipedia"))]);
        let out = tools.execute(&call("calculator", serde_json::json!({}))).await;
        assert_eq!(out, "Error: unknown tool 'calculator'");
    }

    #[tokio::test]
    async fn test_failure_and_bad_arguments_become_text() {
        let tools = ToolBox::new(vec![
            BoxTool::new(EchoTool::failing("wikipedia")),
            BoxTool::new(EchoTool::new("web_search")),
        ]);
        let failed = tools
            .execute(&call("wikipedia", serde_json::json!({"query": "x"})))
            .await;
        assert!(failed.contains("HTTP 503"));

        let bad = tools.execute(&call("web_search", serde_json::json!({"q": 1}))).await;
        assert!(bad.contains("missing string argument 'query'"));
    }
}
