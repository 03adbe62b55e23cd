//! Paginated page fetch tool

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::traits::{Tool, ToolResult};
use super::{optional_int, required_str};
use crate::content::{ContentChunk, WebContentFetcher, CHUNK_SIZE};
use crate::mcp::ToolAnnotations;
use crate::{Error, Result};

const MAX_URL_CHARS: usize = 2048;

/// Output of `fetch_content`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchContentOutput {
    pub text: String,
    /// Characters in `text`
    pub content_length: i64,
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<i64>,
    pub is_truncated: bool,
    pub total_length: i64,
    pub success: bool,
}

impl From<ContentChunk> for FetchContentOutput {
    fn from(chunk: ContentChunk) -> Self {
        FetchContentOutput {
            content_length: chunk.text.chars().count() as i64,
            text: chunk.text,
            offset: chunk.offset,
            next_offset: chunk.next_offset,
            is_truncated: chunk.is_truncated,
            total_length: chunk.total_length,
            success: true,
        }
    }
}

pub struct FetchContentTool {
    fetcher: WebContentFetcher,
}

impl FetchContentTool {
    pub fn new(fetcher: WebContentFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Tool for FetchContentTool {
    fn name(&self) -> &str {
        "fetch_content"
    }

    fn description(&self) -> &str {
        "Fetch the text content of a web page or PDF. Long documents are returned \
         30,000 characters at a time: when is_truncated is true, call again with \
         offset set to next_offset to read the following chunk."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The http(s) URL to fetch"
                },
                "offset": {
                    "type": "integer",
                    "description": format!(
                        "Character offset to start from (default: 0). Each call returns up to {} characters.",
                        CHUNK_SIZE
                    ),
                    "minimum": 0,
                    "default": 0
                }
            },
            "required": ["url"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only("Fetch Web Content", false)
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let url = required_str(&args, "url", MAX_URL_CHARS)?;
        let offset = optional_int(&args, "offset")?.unwrap_or(0);
        if offset < 0 {
            return Err(Error::InvalidArgument(format!(
                "offset must be non-negative, got {}",
                offset
            )));
        }

        match self.fetcher.fetch_page(url, offset).await {
            Ok(chunk) => ToolResult::success_from(&FetchContentOutput::from(chunk)),
            Err(e @ Error::InvalidArgument(_)) => Err(e),
            Err(e) => {
                warn!("Fetching {} failed: {}", url, e);
                Ok(ToolResult::failure(format!("Failed to fetch {}: {}", url, e)))
            }
        }
    }
}
