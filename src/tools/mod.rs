//! Tools module - the MCP tools this server exposes
//!
//! Each tool is a self-contained module that implements the `Tool` trait.
//! Tools are registered into a `ToolRegistry` and served by the MCP handler.
//!
//! ## Built-in Tools
//!
//! - **search**: General web search through SearxNG
//! - **search_videos**: YouTube video search through SearxNG
//! - **fetch_content**: Paginated page text (30,000 chars per call)
//! - **fetch_youtube_content**: Transcript of a YouTube video via STT
//! - **fetch_subreddit**: Posts of a subreddit
//! - **fetch_subreddit_post**: A Reddit post with its comment tree
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `src/tools/` (e.g., `my_tool.rs`)
//! 2. Implement the `Tool` trait
//! 3. Add `mod my_tool;` and `pub use` in this file
//! 4. Register it in `default_registry`

mod traits;
mod registry;
mod search;
mod search_videos;
mod fetch_content;
mod fetch_youtube_content;
mod fetch_subreddit;
mod fetch_subreddit_post;

// Core trait and types
pub use traits::{Tool, ToolCall, ToolResult};

// Registry
pub use registry::ToolRegistry;

// Built-in tools
pub use search::{SearchResultOutput, SearchTool};
pub use search_videos::{SearchVideosTool, VideoSearchResultOutput};
pub use fetch_content::{FetchContentOutput, FetchContentTool};
pub use fetch_youtube_content::FetchYouTubeContentTool;
pub use fetch_subreddit::FetchSubredditTool;
pub use fetch_subreddit_post::FetchSubredditPostTool;

use serde_json::Value;

use crate::config::Config;
use crate::content::WebContentFetcher;
use crate::error::{Error, Result};
use crate::reddit::RedditClient;
use crate::search::SearxngClient;
use crate::youtube::YouTubeTranscriber;

/// Build the registry with every built-in tool
pub fn default_registry(config: &Config) -> Result<ToolRegistry> {
    let searxng = SearxngClient::new(config.search.clone())?;
    let fetcher = WebContentFetcher::new(config.fetch.clone())?;
    let reddit = RedditClient::new(config.reddit.clone(), &config.fetch)?;

    let mut registry = ToolRegistry::new();
    registry.register(SearchTool::new(searxng.clone()));
    registry.register(SearchVideosTool::new(searxng));
    registry.register(FetchContentTool::new(fetcher));
    registry.register(FetchYouTubeContentTool::new(YouTubeTranscriber::new(
        config.stt.clone(),
    )));
    registry.register(FetchSubredditTool::new(reddit.clone()));
    registry.register(FetchSubredditPostTool::new(reddit));

    Ok(registry)
}

/// A required, non-blank string argument of at most `max_chars` characters
pub(crate) fn required_str<'a>(args: &'a Value, key: &str, max_chars: usize) -> Result<&'a str> {
    let value = args
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .ok_or_else(|| Error::InvalidArgument(format!("Missing '{}' parameter", key)))?;

    if value.is_empty() {
        return Err(Error::InvalidArgument(format!("'{}' must not be empty", key)));
    }
    if value.chars().count() > max_chars {
        return Err(Error::InvalidArgument(format!(
            "'{}' must be at most {} characters",
            key, max_chars
        )));
    }
    Ok(value)
}

/// An optional string argument; blank counts as absent
pub(crate) fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// An optional integer argument. Integral floats and numeric strings are
/// accepted since some clients send them.
pub(crate) fn optional_int(args: &Value, key: &str) -> Result<Option<i64>> {
    let invalid = || Error::InvalidArgument(format!("'{}' must be an integer", key));
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| Some(f as i64))
                .ok_or_else(invalid),
        },
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str() {
        let args = json!({"query": "  rust  ", "blank": "   ", "num": 3});
        assert_eq!(required_str(&args, "query", 500).unwrap(), "rust");
        assert!(required_str(&args, "blank", 500).is_err());
        assert!(required_str(&args, "num", 500).is_err());
        assert!(required_str(&args, "missing", 500).is_err());
        assert!(required_str(&json!({"q": "x".repeat(501)}), "q", 500).is_err());
    }

    #[test]
    fn test_optional_int() {
        let args = json!({"a": 5, "b": 7.0, "c": "12", "d": 1.5, "e": true, "f": null});
        assert_eq!(optional_int(&args, "a").unwrap(), Some(5));
        assert_eq!(optional_int(&args, "b").unwrap(), Some(7));
        assert_eq!(optional_int(&args, "c").unwrap(), Some(12));
        assert!(optional_int(&args, "d").is_err());
        assert!(optional_int(&args, "e").is_err());
        assert_eq!(optional_int(&args, "f").unwrap(), None);
        assert_eq!(optional_int(&args, "missing").unwrap(), None);
    }

    #[test]
    fn test_default_registry() {
        let registry = default_registry(&Config::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "fetch_content",
                "fetch_subreddit",
                "fetch_subreddit_post",
                "fetch_youtube_content",
                "search",
                "search_videos",
            ]
        );
    }

    #[test]
    fn test_annotations() {
        let registry = default_registry(&Config::default()).unwrap();
        let hints: Vec<(String, bool)> = registry
            .definitions()
            .into_iter()
            .map(|t| {
                let a = t.annotations.unwrap();
                (a.title.unwrap(), a.idempotent_hint.unwrap())
            })
            .collect();

        assert_eq!(
            hints,
            vec![
                ("Fetch Web Content".to_string(), false),
                ("Fetch Subreddit Posts".to_string(), false),
                ("Fetch Subreddit Post with Comments".to_string(), false),
                ("Fetch YouTube Transcript".to_string(), false),
                ("Web Search".to_string(), true),
                ("YouTube Video Search".to_string(), true),
            ]
        );
    }
}
