//! Configuration types module
//!
//! One sub-module per upstream concern, plus the server/log settings that
//! live here directly.

pub mod media;
pub mod search;

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// SearxNG search settings
    #[serde(default)]
    pub search: search::SearchConfig,

    /// Web page fetching settings
    #[serde(default)]
    pub fetch: search::FetchConfig,

    /// Speech-to-text / YouTube pipeline settings
    #[serde(default)]
    pub stt: media::SttConfig,

    /// Reddit settings
    #[serde(default)]
    pub reddit: media::RedditConfig,

    /// MCP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Transport the MCP server speaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Streamable HTTP (`POST /mcp`)
    #[default]
    Http,
    /// Legacy HTTP+SSE (`GET /sse`, `POST /messages`)
    Sse,
    /// Newline-delimited JSON over stdin/stdout
    Stdio,
}

impl std::str::FromStr for Transport {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" | "streamable-http" => Ok(Transport::Http),
            "sse" => Ok(Transport::Sse),
            "stdio" => Ok(Transport::Stdio),
            _ => Err(crate::Error::Config(format!(
                "Invalid MCP transport: {}. Valid options: http, sse, stdio",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Http => write!(f, "http"),
            Transport::Sse => write!(f, "sse"),
            Transport::Stdio => write!(f, "stdio"),
        }
    }
}

/// MCP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Transport
    #[serde(default)]
    pub transport: Transport,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
            host: default_host(),
            transport: Transport::default(),
        }
    }
}

fn default_port() -> u16 {
    3090
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info,webintel=debug".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.port, 3090);
        assert_eq!(config.server.transport, Transport::Http);
        assert!(config.search.searxng_host.is_none());
    }

    #[test]
    fn test_transport_parsing() {
        assert_eq!("http".parse::<Transport>().unwrap(), Transport::Http);
        assert_eq!("SSE".parse::<Transport>().unwrap(), Transport::Sse);
        assert_eq!("stdio".parse::<Transport>().unwrap(), Transport::Stdio);
        assert!("websocket".parse::<Transport>().is_err());
    }
}
