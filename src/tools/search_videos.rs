//! Video search tool (YouTube engine through SearxNG)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::traits::{Tool, ToolResult};
use super::{optional_int, required_str};
use crate::mcp::ToolAnnotations;
use crate::search::{MediaLength, SearxngClient, VideoSearchResult};
use crate::Result;

const MAX_QUERY_CHARS: usize = 500;
const DEFAULT_RESULTS: i64 = 10;
const MAX_RESULTS: i64 = 20;
const ENGINES: &[&str] = &["youtube"];

/// One video hit as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSearchResultOutput {
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub content: Option<String>,
    pub length: Option<MediaLength>,
}

impl From<VideoSearchResult> for VideoSearchResultOutput {
    fn from(r: VideoSearchResult) -> Self {
        VideoSearchResultOutput {
            url: r.url,
            title: r.title,
            author: r.author,
            content: r.content,
            length: r.duration,
        }
    }
}

pub struct SearchVideosTool {
    client: SearxngClient,
}

impl SearchVideosTool {
    pub fn new(client: SearxngClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchVideosTool {
    fn name(&self) -> &str {
        "search_videos"
    }

    fn description(&self) -> &str {
        "Search for YouTube videos. Returns URLs, titles, authors, descriptions and lengths. \
         Use fetch_youtube_content to get a transcript."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query",
                    "minLength": 1,
                    "maxLength": MAX_QUERY_CHARS
                },
                "max_results": {
                    "type": "integer",
                    "description": "Number of results to return (1-20, default: 10)",
                    "minimum": 1,
                    "maximum": MAX_RESULTS,
                    "default": DEFAULT_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only("YouTube Video Search", true)
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let query = required_str(&args, "query", MAX_QUERY_CHARS)?;
        let max_results = optional_int(&args, "max_results")?
            .unwrap_or(DEFAULT_RESULTS)
            .clamp(1, MAX_RESULTS) as usize;

        match self.client.search_videos(query, ENGINES, Some(max_results)).await {
            Ok(results) => {
                let output: Vec<VideoSearchResultOutput> =
                    results.into_iter().map(Into::into).collect();
                ToolResult::success_from(&output)
            }
            Err(e) => {
                warn!("Video search for '{}' failed: {}", query, e);
                Ok(ToolResult::failure(format!("Video search failed: {}", e)))
            }
        }
    }
}
