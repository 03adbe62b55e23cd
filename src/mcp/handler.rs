//! JSON-RPC dispatcher shared by every transport

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::protocol::{
    McpContent, McpError, McpRequest, McpResponse, McpToolResult, ServerInfo,
    DEFAULT_PROTOCOL_VERSION,
};
use crate::error::Error;
use crate::tools::{ToolCall, ToolRegistry};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "WebIntel MCP";

/// Handles MCP messages against a tool registry
#[derive(Clone)]
pub struct McpHandler {
    registry: Arc<ToolRegistry>,
    info: ServerInfo,
}

impl McpHandler {
    pub fn new(registry: ToolRegistry) -> Self {
        McpHandler {
            registry: Arc::new(registry),
            info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: crate::VERSION.to_string(),
            },
        }
    }

    /// Handle one raw message (a request, notification or batch).
    ///
    /// Returns the JSON to send back, or `None` when nothing is owed.
    pub async fn handle_message(&self, raw: &str) -> Option<Value> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => {
                warn!("Unparseable MCP message: {}", e);
                Some(to_value(McpResponse::error(Value::Null, McpError::parse_error(e))))
            }
        }
    }

    /// Handle an already-parsed message
    pub async fn handle_value(&self, value: Value) -> Option<Value> {
        match value {
            Value::Array(batch) => {
                if batch.is_empty() {
                    return Some(to_value(McpResponse::error(
                        Value::Null,
                        McpError::invalid_request("Empty batch"),
                    )));
                }
                let mut responses = Vec::new();
                for item in batch {
                    if let Some(response) = self.handle_single(item).await {
                        responses.push(to_value(response));
                    }
                }
                (!responses.is_empty()).then(|| Value::Array(responses))
            }
            single => self.handle_single(single).await.map(to_value),
        }
    }

    async fn handle_single(&self, value: Value) -> Option<McpResponse> {
        let id = value.get("id").cloned();

        // Responses to server-initiated requests carry no method; nothing to do
        if value.get("method").is_none()
            && (value.get("result").is_some() || value.get("error").is_some())
        {
            return None;
        }

        match serde_json::from_value::<McpRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(McpResponse::error(
                id.unwrap_or(Value::Null),
                McpError::invalid_request(format!("Invalid request: {}", e)),
            )),
        }
    }

    /// Handle a decoded request; notifications get no response
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!("MCP {} (id: {:?})", request.method, request.id);

        if request.jsonrpc != "2.0" {
            return request.id.map(|id| {
                McpResponse::error(id, McpError::invalid_request("jsonrpc must be \"2.0\""))
            });
        }

        let is_notification = request.is_notification();
        let result = self.dispatch(&request.method, request.params).await;

        if is_notification {
            if let Err(e) = result {
                debug!("Notification {} failed: {}", request.method, e.message);
            }
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        Some(match result {
            Ok(value) => McpResponse::success(id, value),
            Err(error) => McpResponse::error(id, error),
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        match method {
            "initialize" => Ok(self.initialize(params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.definitions() })),
            "tools/call" => self.call_tool(params).await,
            m if m.starts_with("notifications/") => Ok(Value::Null),
            m => Err(McpError::method_not_found(m)),
        }
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let version = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        let client = params
            .and_then(|p| p.pointer("/clientInfo/name"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        info!("MCP client '{}' initializing (protocol {})", client, version);

        json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": self.info,
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params = params.ok_or_else(|| McpError::invalid_params("Missing params"))?;
        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| McpError::invalid_params(format!("Invalid tools/call params: {}", e)))?;

        info!("Calling tool {}", call.name);

        let result = match self.registry.execute(&call).await {
            Ok(result) => McpToolResult {
                content: vec![McpContent::text(result.to_text())],
                structured_content: result.structured_content(),
                is_error: !result.success,
            },
            Err(Error::InvalidArgument(msg)) => return Err(McpError::invalid_params(msg)),
            Err(e) => {
                warn!("Tool {} failed: {}", call.name, e);
                McpToolResult {
                    content: vec![McpContent::text(format!("Error: {}", e))],
                    structured_content: None,
                    is_error: true,
                }
            }
        };

        serde_json::to_value(result).map_err(|e| McpError::internal(e.to_string()))
    }
}

fn to_value(response: McpResponse) -> Value {
    serde_json::to_value(&response).unwrap_or_else(|e| {
        json!({
            "jsonrpc": "2.0",
            "id": response.id,
            "error": McpError::internal(e.to_string()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
    use crate::tools::{Tool, ToolResult};
    use async_trait::async_trait;

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercase a string"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"s": {"type": "string"}}, "required": ["s"]})
        }

        async fn execute(&self, args: Value) -> crate::Result<ToolResult> {
            let s = args
                .get("s")
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::InvalidArgument("Missing 's' parameter".into()))?;
            if s == "fail" {
                return Ok(ToolResult::failure("upstream down"));
            }
            Ok(ToolResult::success(json!({ "upper": s.to_uppercase() })))
        }
    }

    fn handler() -> McpHandler {
        let mut registry = ToolRegistry::new();
        registry.register(Upper);
        McpHandler::new(registry)
    }

    async fn call(h: &McpHandler, msg: Value) -> Value {
        h.handle_message(&msg.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let h = handler();
        let resp = call(
            &h,
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
                   "params": {"protocolVersion": "2024-11-05", "clientInfo": {"name": "test"}}}),
        )
        .await;
        assert_eq!(resp["result"]["protocolVersion"], json!("2024-11-05"));
        assert_eq!(resp["result"]["serverInfo"]["name"], json!("WebIntel MCP"));
        assert_eq!(resp["result"]["capabilities"]["tools"]["listChanged"], json!(false));

        let resp = call(&h, json!({"jsonrpc": "2.0", "id": 2, "method": "initialize"})).await;
        assert_eq!(resp["result"]["protocolVersion"], json!(DEFAULT_PROTOCOL_VERSION));
    }

    #[tokio::test]
    async fn test_tools_list_and_ping() {
        let h = handler();
        let resp = call(&h, json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"})).await;
        assert_eq!(resp["id"], json!("a"));
        assert_eq!(resp["result"]["tools"][0]["name"], json!("upper"));
        assert!(resp["result"]["tools"][0]["inputSchema"].is_object());

        let resp = call(&h, json!({"jsonrpc": "2.0", "id": 3, "method": "ping"})).await;
        assert_eq!(resp["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tools_call() {
        let h = handler();
        let resp = call(
            &h,
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
                   "params": {"name": "upper", "arguments": {"s": "abc"}}}),
        )
        .await;
        let result = &resp["result"];
        assert_eq!(result["isError"], json!(false));
        assert_eq!(result["structuredContent"]["upper"], json!("ABC"));
        assert_eq!(result["content"][0]["type"], json!("text"));
        assert!(result["content"][0]["text"].as_str().unwrap().contains("ABC"));

        let resp = call(
            &h,
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "upper", "arguments": {"s": "fail"}}}),
        )
        .await;
        assert_eq!(resp["result"]["isError"], json!(true));
        assert_eq!(resp["result"]["content"][0]["text"], json!("Error: upstream down"));
    }

    #[tokio::test]
    async fn test_call_errors() {
        let h = handler();
        let resp = call(
            &h,
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
                   "params": {"name": "missing", "arguments": {}}}),
        )
        .await;
        assert_eq!(resp["error"]["code"], json!(INVALID_PARAMS));

        let resp = call(
            &h,
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "upper", "arguments": {}}}),
        )
        .await;
        assert_eq!(resp["error"]["code"], json!(INVALID_PARAMS));

        let resp = call(&h, json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call"})).await;
        assert_eq!(resp["error"]["code"], json!(INVALID_PARAMS));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let h = handler();
        let resp = call(&h, json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"})).await;
        assert_eq!(resp["error"]["code"], json!(METHOD_NOT_FOUND));

        let resp = h.handle_message("{not json").await.unwrap();
        assert_eq!(resp["error"]["code"], json!(PARSE_ERROR));
        assert_eq!(resp["id"], Value::Null);

        let resp = call(&h, json!({"jsonrpc": "2.0", "id": 9})).await;
        assert_eq!(resp["error"]["code"], json!(INVALID_REQUEST));
        assert_eq!(resp["id"], json!(9));

        let resp = call(&h, json!({"jsonrpc": "1.0", "id": 4, "method": "ping"})).await;
        assert_eq!(resp["error"]["code"], json!(INVALID_REQUEST));
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let h = handler();
        let msg = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert!(h.handle_message(&msg.to_string()).await.is_none());

        let msg = json!({"jsonrpc": "2.0", "method": "unknown/thing"});
        assert!(h.handle_message(&msg.to_string()).await.is_none());

        let msg = json!({"jsonrpc": "2.0", "id": 5, "result": {}});
        assert!(h.handle_message(&msg.to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_batch() {
        let h = handler();
        let batch = json!([
            {"jsonrpc": "2.0", "id": 1, "method": "ping"},
            {"jsonrpc": "2.0", "method": "notifications/initialized"},
            {"jsonrpc": "2.0", "id": 2, "method": "tools/list"}
        ]);
        let resp = call(&h, batch).await;
        assert_eq!(resp.as_array().unwrap().len(), 2);

        let notes = json!([{"jsonrpc": "2.0", "method": "notifications/initialized"}]);
        assert!(h.handle_message(&notes.to_string()).await.is_none());

        let resp = call(&h, json!([])).await;
        assert_eq!(resp["error"]["code"], json!(INVALID_REQUEST));
    }
}
