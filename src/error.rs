//! Error types for WebIntel

use thiserror::Error;

/// Result type alias using WebIntel's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for WebIntel
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied an argument outside the accepted domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// SearxNG request could not be completed
    #[error("Search request failed: {0}")]
    SearchRequest(String),

    /// SearxNG answered with something we could not decode
    #[error("Failed to parse search response: {0}")]
    SearchParse(String),

    /// Web page could not be fetched, directly or through the reader fallback
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Audio download or speech-to-text failure
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// Resource not found upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream refused access
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Upstream service returned an unexpected status or payload
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// MCP / JSON-RPC protocol violation
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::SearchRequest(_) | Error::Timeout(_) | Error::Upstream(_)
        )
    }

    /// Check if error is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_) | Error::NotFound(_) | Error::Forbidden(_)
        )
    }
}
