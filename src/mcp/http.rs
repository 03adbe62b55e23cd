//! Streamable HTTP transport (`POST /mcp`)

use axum::{
    extract::State,
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};
use uuid::Uuid;

use super::handler::McpHandler;
use super::protocol::{McpError, McpResponse};
use super::sse::SseSessions;

/// Session header issued on `initialize`
pub const MCP_SESSION_ID: HeaderName = HeaderName::from_static("mcp-session-id");

/// State shared by the HTTP and SSE routes
#[derive(Clone)]
pub struct HttpState {
    pub handler: McpHandler,
    pub sessions: SseSessions,
}

impl HttpState {
    pub fn new(handler: McpHandler) -> Self {
        HttpState {
            handler,
            sessions: SseSessions::default(),
        }
    }
}

/// Router for the Streamable HTTP transport
pub fn router(handler: McpHandler) -> Router {
    Router::new()
        .route("/mcp", post(post_mcp).delete(delete_mcp))
        .route("/health", get(health_check))
        .with_state(HttpState::new(handler))
        .layer(CorsLayer::permissive())
}

fn is_initialize(message: &Value) -> bool {
    message.get("method").and_then(|m| m.as_str()) == Some("initialize")
}

async fn post_mcp(State(state): State<HttpState>, body: String) -> Response {
    let message: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            debug!("Rejecting unparseable body: {}", e);
            let error = McpResponse::error(Value::Null, McpError::parse_error(e));
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    let initialize = is_initialize(&message);

    match state.handler.handle_value(message).await {
        Some(reply) => {
            let mut response = Json(reply).into_response();
            if initialize {
                let session = Uuid::new_v4().to_string();
                info!("New MCP session {}", session);
                if let Ok(value) = HeaderValue::from_str(&session) {
                    response.headers_mut().insert(MCP_SESSION_ID, value);
                }
            }
            response
        }
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Session teardown; sessions hold no server state
async fn delete_mcp() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub(crate) async fn health_check() -> &'static str {
    "OK"
}
