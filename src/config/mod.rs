//! Configuration module
//!
//! - types/mod.rs: Core configuration types (Config, ServerConfig, LogConfig)
//! - types/search.rs: SearxNG and web fetch configuration
//! - types/media.rs: Speech-to-text and Reddit configuration
//! - io.rs: Configuration loading
//! - validation.rs: Configuration validation
//! - paths.rs: Configuration file paths

mod io;
mod paths;
mod types;
mod validation;

// Re-export core config types
pub use types::{Config, LogConfig, ServerConfig, Transport};

pub use types::search::{FetchConfig, SearchConfig};
pub use types::media::{RedditConfig, SttConfig};

// Re-export IO and utilities
pub use io::{apply_env_overrides, load_config_file, load_config_from_path};
pub use paths::{config_dir, config_path};
pub use validation::{validate_config, ConfigValidationResult, ValidationIssue};
