//! MCP (Model Context Protocol) server
//!
//! Serves the tool registry to MCP clients over one of three transports.
//!
//! ## Architecture
//!
//! - **protocol**: Wire protocol types (JSON-RPC based)
//! - **handler**: Transport-independent request dispatch
//! - **http**: Streamable HTTP (`POST /mcp`)
//! - **sse**: Legacy SSE (`GET /sse` + `POST /messages`)
//! - **stdio**: Newline-delimited JSON on stdin/stdout
//!
//! ## Usage
//!
//! ```rust,no_run
//! use webintel::config::{Config, ServerConfig};
//! use webintel::mcp::{serve, McpHandler};
//! use webintel::tools::default_registry;
//!
//! # async fn example() -> webintel::Result<()> {
//! let config = Config::default();
//! let handler = McpHandler::new(default_registry(&config)?);
//! serve(handler, &ServerConfig::default()).await?;
//! # Ok(())
//! # }
//! ```

mod handler;
mod http;
mod protocol;
mod sse;
mod stdio;

pub use handler::{McpHandler, SERVER_NAME};
pub use http::{HttpState, MCP_SESSION_ID};
pub use protocol::{
    McpContent, McpError, McpRequest, McpResponse, McpTool, McpToolResult, ServerInfo,
    ToolAnnotations, DEFAULT_PROTOCOL_VERSION, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use sse::SseSessions;
pub use stdio::{serve_io, serve_stdio};

use axum::Router;
use tracing::info;

use crate::config::{ServerConfig, Transport};
use crate::error::{Error, Result};

/// Router for an HTTP-based transport
pub fn router(handler: McpHandler, transport: Transport) -> Result<Router> {
    match transport {
        Transport::Http => Ok(http::router(handler)),
        Transport::Sse => Ok(sse::router(handler)),
        Transport::Stdio => Err(Error::Protocol(
            "stdio transport is not served over HTTP".to_string(),
        )),
    }
}

/// Run the server on the configured transport until shutdown
pub async fn serve(handler: McpHandler, config: &ServerConfig) -> Result<()> {
    if config.transport == Transport::Stdio {
        return serve_stdio(handler).await;
    }

    let app = router(handler, config.transport)?;
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Config(format!("Failed to bind {}: {}", addr, e)))?;

    match config.transport {
        Transport::Sse => info!("MCP server (sse) listening on http://{}/sse", addr),
        _ => info!("MCP server (streamable http) listening on http://{}/mcp", addr),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("MCP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            tracing::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;

    #[test]
    fn test_router_per_transport() {
        let handler = McpHandler::new(ToolRegistry::new());
        assert!(router(handler.clone(), Transport::Http).is_ok());
        assert!(router(handler.clone(), Transport::Sse).is_ok());
        assert!(matches!(
            router(handler, Transport::Stdio),
            Err(Error::Protocol(_))
        ));
    }
}
