//! # WebIntel
//!
//! An MCP server giving AI assistants web intelligence tools, backed by
//! self-hosted and public services.
//!
//! ## Features
//!
//! - **Web & Video Search:** SearxNG metasearch (`search`, `search_videos`)
//! - **Content Fetch:** Page and PDF text, paginated 30,000 chars at a time
//! - **YouTube Transcripts:** `yt-dlp` audio plus an OpenAI-compatible STT endpoint
//! - **Reddit:** Subreddit listings and full comment threads
//! - **Transports:** Streamable HTTP, legacy SSE, and stdio

pub mod config;
pub mod content;
pub mod error;
pub mod mcp;
pub mod reddit;
pub mod search;
pub mod tools;
pub mod youtube;

pub use config::Config;
pub use error::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
