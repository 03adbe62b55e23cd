//! Configuration I/O - Loading and saving configuration
//!
//! Handles reading configuration from files and environment variables.

use secrecy::SecretString;
use std::path::Path;
use tracing::warn;

use super::types::{Config, Transport};
use crate::error::{Error, Result};

/// Load the config file at the default location, or defaults if there is none.
///
/// Environment overrides are layered on separately with [`apply_env_overrides`].
pub fn load_config_file() -> Result<Config> {
    let config_path = super::paths::config_path();

    if config_path.exists() {
        load_config_from_path(&config_path)
    } else {
        Ok(Config::default())
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    // Detect format by extension
    let config: Config = if path.extension().map_or(false, |ext| ext == "json") {
        // Parse as JSON5 (more lenient than strict JSON)
        json5::from_str(&content).map_err(|e| Error::Config(format!("Invalid JSON config: {}", e)))?
    } else if path.extension().map_or(false, |ext| ext == "toml") {
        toml::from_str(&content).map_err(|e| Error::Config(format!("Invalid TOML config: {}", e)))?
    } else {
        // Try JSON5 first, then TOML
        json5::from_str(&content)
            .or_else(|_| toml::from_str(&content).map_err(|e| Error::Config(e.to_string())))
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?
    };

    Ok(config)
}

/// Apply environment variable overrides to an existing config.
///
/// Loads `.env` first, then overlays every recognised variable. Env vars
/// have the highest precedence: defaults < file < env.
pub fn apply_env_overrides(config: &mut Config) {
    dotenvy::dotenv().ok();
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Overlay values produced by `lookup` onto `config`.
pub(crate) fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    // SearxNG
    if let Some(host) = non_empty("SEARXNG_HOST") {
        config.search.searxng_host = Some(host.trim_end_matches('/').to_string());
    }

    // Fetching
    if let Some(proxy) = non_empty("PROXY_URL") {
        config.fetch.proxy_url = Some(proxy);
    }
    if let Some(ua) = non_empty("FETCH_USER_AGENT") {
        config.fetch.user_agent = ua;
    }

    // Speech-to-text
    if let Some(endpoint) = non_empty("STT_ENDPOINT") {
        config.stt.endpoint = Some(endpoint.trim_end_matches('/').to_string());
    }
    if let Some(model) = non_empty("STT_MODEL") {
        config.stt.model = Some(model);
    }
    if let Some(key) = non_empty("STT_API_KEY") {
        config.stt.api_key = Some(SecretString::from(key));
    }
    if let Some(path) = non_empty("YT_DLP_PATH") {
        config.stt.yt_dlp_path = Some(std::path::PathBuf::from(path));
    }

    // Server
    if let Some(port) = non_empty("MCP_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!("Ignoring invalid MCP_PORT '{}'", port),
        }
    }
    if let Some(host) = non_empty("MCP_HOST") {
        config.server.host = host;
    }
    if let Some(transport) = non_empty("MCP_TRANSPORT") {
        config.server.transport = match transport.parse::<Transport>() {
            Ok(t) => t,
            Err(_) => {
                warn!("Invalid MCP_TRANSPORT '{}', defaulting to 'http'", transport);
                Transport::Http
            }
        };
    }

    // Logging
    if let Some(level) = non_empty("RUST_LOG") {
        config.log.level = level;
    }
    if let Some(format) = non_empty("LOG_FORMAT") {
        config.log.format = format;
    }
}
