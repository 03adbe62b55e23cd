//! Tool registry - the set of tools served over MCP

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::mcp::McpTool;

use super::traits::{Tool, ToolCall, ToolResult};

/// Registry of available tools, listed in name order
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ToolRegistry {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<McpTool> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool call. Unknown tools are an `InvalidArgument` error.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        match self.get(&call.name) {
            Some(tool) => tool.execute(call.arguments.clone()).await,
            None => Err(Error::InvalidArgument(format!("Unknown tool: {}", call.name))),
        }
    }

    /// Get tool count
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// List tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}
