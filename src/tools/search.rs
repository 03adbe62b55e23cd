//! Web search tool
//!
//! General web search through the configured SearxNG instance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::traits::{Tool, ToolResult};
use super::{optional_int, required_str};
use crate::mcp::ToolAnnotations;
use crate::search::{GeneralSearchResult, SearxngClient};
use crate::Result;

const MAX_QUERY_CHARS: usize = 500;
const DEFAULT_RESULTS: i64 = 10;
const MAX_RESULTS: i64 = 25;

/// One search hit as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultOutput {
    pub title: String,
    pub url: String,
    pub content: Option<String>,
    pub score: f64,
}

impl From<GeneralSearchResult> for SearchResultOutput {
    fn from(r: GeneralSearchResult) -> Self {
        SearchResultOutput {
            title: r.title,
            url: r.url,
            content: r.content,
            score: r.score.unwrap_or(0.0),
        }
    }
}

/// General web search tool
pub struct SearchTool {
    client: SearxngClient,
}

impl SearchTool {
    pub fn new(client: SearxngClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the web. Returns titles, URLs, snippets and relevance scores. \
         Use fetch_content to read a result in full."
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
                    "description": "Number of results to return (1-25, default: 10)",
                    "minimum": 1,
                    "maximum": MAX_RESULTS,
                    "default": DEFAULT_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only("Web Search", true)
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let query = required_str(&args, "query", MAX_QUERY_CHARS)?;
        let max_results = optional_int(&args, "max_results")?
            .unwrap_or(DEFAULT_RESULTS)
            .clamp(1, MAX_RESULTS) as usize;

        match self.client.search_general(query, Some(max_results)).await {
            Ok(results) => {
                let output: Vec<SearchResultOutput> =
                    results.into_iter().map(Into::into).collect();
                ToolResult::success_from(&output)
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                Ok(ToolResult::failure(format!("Search failed: {}", e)))
            }
        }
    }
}
