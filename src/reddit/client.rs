//! Reddit JSON API client (old.reddit.com, no authentication)

use reqwest::header::USER_AGENT;
use reqwest::{Client, Proxy, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::models::{
    parse_listing, parse_post_response, CommentSort, RedditPostOutput, SubredditPostsOutput,
    SubredditSort, TimeFilter,
};
use crate::config::{FetchConfig, RedditConfig};
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_POSTS: u32 = 100;
const MAX_COMMENTS: u32 = 500;

/// Client for the public Reddit JSON endpoints
#[derive(Clone)]
pub struct RedditClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl RedditClient {
    pub fn new(config: RedditConfig, fetch: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(ref proxy) = fetch.proxy_url {
            let proxy = Proxy::all(proxy.as_str())
                .map_err(|e| Error::Config(format!("Invalid proxy URL '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: fetch.user_agent.clone(),
        })
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = url::Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .map_err(|e| Error::Config(format!("Invalid Reddit base URL: {}", e)))?;

        debug!("Reddit request: {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout("Reddit request timed out".to_string())
                } else {
                    Error::Upstream(format!("Reddit request failed: {}", e))
                }
            })?;

        match response.status() {
            s if s.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(Error::NotFound(format!("Reddit resource not found: {}", path))),
            StatusCode::FORBIDDEN => Err(Error::Forbidden(format!(
                "Access to {} is forbidden (private or quarantined)",
                path
            ))),
            s => Err(Error::Upstream(format!("Reddit returned status {}", s))),
        }
    }

    /// Fetch a page of posts from a subreddit
    pub async fn fetch_subreddit_posts(
        &self,
        subreddit: &str,
        sort: SubredditSort,
        time_filter: Option<TimeFilter>,
        limit: u32,
        after: Option<&str>,
    ) -> Result<SubredditPostsOutput> {
        let subreddit = normalize_subreddit(subreddit)?;
        if !(1..=MAX_POSTS).contains(&limit) {
            return Err(Error::InvalidArgument(format!(
                "limit must be between 1 and {}, got {}",
                MAX_POSTS, limit
            )));
        }

        let time_filter = time_filter.filter(|_| sort.takes_time_filter());

        let mut params = vec![("limit", limit.to_string())];
        if let Some(t) = time_filter {
            params.push(("t", t.as_str().to_string()));
        }
        if let Some(after) = after.map(str::trim).filter(|a| !a.is_empty()) {
            params.push(("after", after.to_string()));
        }

        let listing = self
            .get_json(&format!("/r/{}/{}.json", subreddit, sort), &params)
            .await?;
        let (posts, after_cursor) = parse_listing(&listing);

        info!("Fetched {} posts from r/{} ({})", posts.len(), subreddit, sort);

        Ok(SubredditPostsOutput {
            subreddit,
            sort,
            time_filter,
            posts,
            after_cursor,
            success: true,
        })
    }

    /// Fetch a post with its comment tree
    pub async fn fetch_post_with_comments(
        &self,
        subreddit: &str,
        post_id: &str,
        sort: CommentSort,
        limit: u32,
        depth: Option<u32>,
    ) -> Result<RedditPostOutput> {
        let subreddit = normalize_subreddit(subreddit)?;
        let post_id = normalize_post_id(post_id)?;
        if !(1..=MAX_COMMENTS).contains(&limit) {
            return Err(Error::InvalidArgument(format!(
                "limit must be between 1 and {}, got {}",
                MAX_COMMENTS, limit
            )));
        }
        if depth == Some(0) {
            return Err(Error::InvalidArgument("depth must be at least 1".to_string()));
        }

        let mut params = vec![
            ("sort", sort.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(depth) = depth {
            params.push(("depth", depth.to_string()));
        }

        let response = self
            .get_json(&format!("/r/{}/comments/{}.json", subreddit, post_id), &params)
            .await?;
        let post = parse_post_response(&response)?;

        info!(
            "Fetched post {} from r/{} with {} top-level comments",
            post_id,
            subreddit,
            post.comments.len()
        );

        Ok(RedditPostOutput { post, success: true })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Accepts `rust`, `r/rust` or `/r/rust/`
fn normalize_subreddit(subreddit: &str) -> Result<String> {
    let name = subreddit.trim().trim_matches('/');
    let name = name.strip_prefix("r/").unwrap_or(name);
    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(Error::InvalidArgument(format!("Invalid subreddit name: '{}'", subreddit)));
    }
    Ok(name.to_string())
}

/// Accepts a bare id or a `t3_` fullname
fn normalize_post_id(post_id: &str) -> Result<String> {
    let id = post_id.trim();
    let id = id.strip_prefix("t3_").unwrap_or(id);
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidArgument(format!("Invalid post id: '{}'", post_id)));
    }
    Ok(id.to_string())
}
