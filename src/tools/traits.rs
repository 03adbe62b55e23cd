//! Core tool trait and result types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::mcp::{McpTool, ToolAnnotations};

/// A tool exposed to MCP clients.
///
/// `execute` returns `Err` only for bad arguments; upstream failures are
/// reported as a failed [`ToolResult`] so the client sees them as tool output.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the tool description
    fn description(&self) -> &str;

    /// Get the JSON Schema for tool parameters
    fn parameters_schema(&self) -> Value;

    /// Behaviour hints advertised in `tools/list`
    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only(self.name(), false)
    }

    /// Execute the tool with given arguments
    async fn execute(&self, args: Value) -> Result<ToolResult>;

    /// Convert to an MCP tool definition
    fn to_definition(&self) -> McpTool {
        McpTool {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
            annotations: Some(self.annotations()),
        }
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Structured output (for successful execution)
    pub content: Option<Value>,
    /// Error message (for failed execution)
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result from a structured value
    pub fn success(content: Value) -> Self {
        ToolResult {
            success: true,
            content: Some(content),
            error: None,
        }
    }

    /// Serialize `output` into a successful result
    pub fn success_from<T: Serialize>(output: &T) -> Result<Self> {
        Ok(Self::success(serde_json::to_value(output)?))
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>) -> Self {
        ToolResult {
            success: false,
            content: None,
            error: Some(error.into()),
        }
    }

    /// Text form sent as the MCP text content block
    pub fn to_text(&self) -> String {
        if self.success {
            match &self.content {
                Some(Value::String(s)) => s.clone(),
                Some(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
                None => String::new(),
            }
        } else {
            format!("Error: {}", self.error.clone().unwrap_or_default())
        }
    }

    /// Structured content as an object; MCP requires `structuredContent`
    /// to be one, so other values are wrapped as `{"result": ...}`
    pub fn structured_content(&self) -> Option<Value> {
        self.content.as_ref().map(|v| match v {
            Value::Object(_) => v.clone(),
            other => serde_json::json!({ "result": other }),
        })
    }
}

/// A `tools/call` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name
    pub name: String,
    /// Tool arguments as JSON
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Parse arguments into a specific type
    pub fn parse_arguments<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        serde_json::from_value(self.arguments.clone())
            .map_err(|e| Error::InvalidArgument(format!("Invalid tool arguments: {}", e)))
    }
}
