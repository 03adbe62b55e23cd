//! Configuration paths
//!
//! Utilities for resolving configuration file paths.

use std::path::PathBuf;

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    // Check for explicit override
    if let Ok(dir) = std::env::var("WEBINTEL_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    // Use XDG config directory or fallback
    dirs::config_dir()
        .map(|d| d.join("webintel"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".config").join("webintel"))
                .unwrap_or_else(|| PathBuf::from(".webintel"))
        })
}

/// Get the main configuration file path
///
/// `config.json` wins over `config.toml` when both exist.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("WEBINTEL_CONFIG") {
        return PathBuf::from(path);
    }

    let dir = config_dir();
    let toml = dir.join("config.toml");
    let json = dir.join("config.json");
    if !json.exists() && toml.exists() {
        toml
    } else {
        json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        // Just ensure these don't panic
        let _ = config_dir();
        let path = config_path();
        assert!(path.file_name().is_some());
    }
}
