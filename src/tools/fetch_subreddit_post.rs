//! Reddit post + comments tool

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::traits::{Tool, ToolResult};
use super::{optional_int, optional_str, required_str};
use crate::mcp::ToolAnnotations;
use crate::reddit::{CommentSort, RedditClient};
use crate::{Error, Result};

const DEFAULT_LIMIT: i64 = 100;
const MAX_POST_ID_CHARS: usize = 20;

pub struct FetchSubredditPostTool {
    client: RedditClient,
}

impl FetchSubredditPostTool {
    pub fn new(client: RedditClient) -> Self {
        Self { client }
    }
}

fn to_u32(value: i64, key: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidArgument(format!("Invalid {}: {}", key, value)))
}

#[async_trait]
impl Tool for FetchSubredditPostTool {
    fn name(&self) -> &str {
        "fetch_subreddit_post"
    }

    fn description(&self) -> &str {
        "Fetch a Reddit post with its body, media links and nested comment tree."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "subreddit": {
                    "type": "string",
                    "description": "Subreddit name without the r/ prefix"
                },
                "post_id": {
                    "type": "string",
                    "description": "Post id (e.g. '1abc2d', a 't3_' prefix is accepted)",
                    "minLength": 1,
                    "maxLength": MAX_POST_ID_CHARS
                },
                "sort": {
                    "type": "string",
                    "enum": ["confidence", "top", "new", "controversial", "old", "qa"],
                    "default": "confidence"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of comments (1-500, default: 100)",
                    "minimum": 1,
                    "maximum": 500,
                    "default": DEFAULT_LIMIT
                },
                "depth": {
                    "type": "integer",
                    "description": "Maximum reply depth",
                    "minimum": 1
                }
            },
            "required": ["subreddit", "post_id"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only("Fetch Subreddit Post with Comments", false)
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let subreddit = required_str(&args, "subreddit", 100)?;
        let post_id = required_str(&args, "post_id", MAX_POST_ID_CHARS)?;
        let sort = optional_str(&args, "sort")
            .map(str::parse::<CommentSort>)
            .transpose()?
            .unwrap_or_default();
        let limit = to_u32(optional_int(&args, "limit")?.unwrap_or(DEFAULT_LIMIT), "limit")?;
        let depth = optional_int(&args, "depth")?
            .map(|d| to_u32(d, "depth"))
            .transpose()?;

        match self
            .client
            .fetch_post_with_comments(subreddit, post_id, sort, limit, depth)
            .await
        {
            Ok(output) => ToolResult::success_from(&output),
            Err(e @ Error::InvalidArgument(_)) => Err(e),
            Err(e) => {
                warn!("Fetching post {} from r/{} failed: {}", post_id, subreddit, e);
                Ok(ToolResult::failure(format!("Failed to fetch post {}: {}", post_id, e)))
            }
        }
    }
}
