//! Subreddit listing tool

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::traits::{Tool, ToolResult};
use super::{optional_int, optional_str, required_str};
use crate::mcp::ToolAnnotations;
use crate::reddit::{RedditClient, SubredditSort, TimeFilter};
use crate::{Error, Result};

const DEFAULT_LIMIT: i64 = 25;

pub struct FetchSubredditTool {
    client: RedditClient,
}

impl FetchSubredditTool {
    pub fn new(client: RedditClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for FetchSubredditTool {
    fn name(&self) -> &str {
        "fetch_subreddit"
    }

    fn description(&self) -> &str {
        "List posts from a subreddit. Use after_cursor from the response as 'after' \
         to get the next page, and fetch_subreddit_post to read a post with its comments."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "subreddit": {
                    "type": "string",
                    "description": "Subreddit name without the r/ prefix (e.g. 'rust')"
                },
                "sort": {
                    "type": "string",
                    "enum": ["hot", "new", "top", "rising", "controversial"],
                    "default": "hot"
                },
                "time_filter": {
                    "type": "string",
                    "enum": ["hour", "day", "week", "month", "year", "all"],
                    "description": "Time window, only used with 'top' and 'controversial'"
                },
                "limit": {
                    "type": "integer",
                    "description": "Number of posts (1-100, default: 25)",
                    "minimum": 1,
                    "maximum": 100,
                    "default": DEFAULT_LIMIT
                },
                "after": {
                    "type": "string",
                    "description": "Pagination cursor from a previous response"
                }
            },
            "required": ["subreddit"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only("Fetch Subreddit Posts", false)
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let subreddit = required_str(&args, "subreddit", 100)?;
        let sort = optional_str(&args, "sort")
            .map(str::parse::<SubredditSort>)
            .transpose()?
            .unwrap_or_default();
        let time_filter = optional_str(&args, "time_filter")
            .map(str::parse::<TimeFilter>)
            .transpose()?;
        let limit = optional_int(&args, "limit")?.unwrap_or(DEFAULT_LIMIT);
        let limit = u32::try_from(limit)
            .map_err(|_| Error::InvalidArgument(format!("Invalid limit: {}", limit)))?;
        let after = optional_str(&args, "after");

        match self
            .client
            .fetch_subreddit_posts(subreddit, sort, time_filter, limit, after)
            .await
        {
            Ok(output) => ToolResult::success_from(&output),
            Err(e @ Error::InvalidArgument(_)) => Err(e),
            Err(e) => {
                warn!("Fetching r/{} failed: {}", subreddit, e);
                Ok(ToolResult::failure(format!("Failed to fetch r/{}: {}", subreddit, e)))
            }
        }
    }
}
