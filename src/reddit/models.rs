//! Reddit listing/comment models and the parsers that build them from the
//! raw old.reddit.com JSON

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

const DELETED: &str = "[deleted]";
const MEDIA_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".mp4"];
static NULL: Value = Value::Null;

/// Listing order for subreddit posts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubredditSort {
    #[default]
    Hot,
    New,
    Top,
    Rising,
    Controversial,
}

impl SubredditSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubredditSort::Hot => "hot",
            SubredditSort::New => "new",
            SubredditSort::Top => "top",
            SubredditSort::Rising => "rising",
            SubredditSort::Controversial => "controversial",
        }
    }

    /// Whether a time filter applies to this order
    pub fn takes_time_filter(&self) -> bool {
        matches!(self, SubredditSort::Top | SubredditSort::Controversial)
    }
}

impl FromStr for SubredditSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(SubredditSort::Hot),
            "new" => Ok(SubredditSort::New),
            "top" => Ok(SubredditSort::Top),
            "rising" => Ok(SubredditSort::Rising),
            "controversial" => Ok(SubredditSort::Controversial),
            _ => Err(Error::InvalidArgument(format!(
                "Invalid sort: {}. Must be one of hot, new, top, rising, controversial",
                s
            ))),
        }
    }
}

impl fmt::Display for SubredditSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window for top/controversial listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

impl FromStr for TimeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hour" => Ok(TimeFilter::Hour),
            "day" => Ok(TimeFilter::Day),
            "week" => Ok(TimeFilter::Week),
            "month" => Ok(TimeFilter::Month),
            "year" => Ok(TimeFilter::Year),
            "all" => Ok(TimeFilter::All),
            _ => Err(Error::InvalidArgument(format!(
                "Invalid time filter: {}. Must be one of hour, day, week, month, year, all",
                s
            ))),
        }
    }
}

/// Comment ordering for a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    #[default]
    Confidence,
    Top,
    New,
    Controversial,
    Old,
    Qa,
}

impl CommentSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentSort::Confidence => "confidence",
            CommentSort::Top => "top",
            CommentSort::New => "new",
            CommentSort::Controversial => "controversial",
            CommentSort::Old => "old",
            CommentSort::Qa => "qa",
        }
    }
}

impl FromStr for CommentSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confidence" => Ok(CommentSort::Confidence),
            "top" => Ok(CommentSort::Top),
            "new" => Ok(CommentSort::New),
            "controversial" => Ok(CommentSort::Controversial),
            "old" => Ok(CommentSort::Old),
            "qa" => Ok(CommentSort::Qa),
            _ => Err(Error::InvalidArgument(format!(
                "Invalid sort: {}. Must be one of confidence, top, new, controversial, old, qa",
                s
            ))),
        }
    }
}

/// Summary of a post, as shown in a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPostSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub subreddit: String,
    pub score: i64,
    pub num_comments: i64,
    pub created_utc: f64,
    pub url: String,
    pub permalink: String,
    pub is_self: bool,
    pub selftext: Option<String>,
    pub thumbnail: Option<String>,
    pub link_flair_text: Option<String>,
}

/// A comment and its nested replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditComment {
    pub id: String,
    pub author: String,
    pub body: String,
    /// Fullname of the parent: `t3_…` for the post, `t1_…` for a comment
    pub parent_id: String,
    pub created_utc: f64,
    pub replies: Vec<RedditComment>,
}

/// A post with its body, media and comment tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPostDetail {
    pub title: String,
    pub author: String,
    pub num_comments: i64,
    pub created_utc: f64,
    pub url: String,
    pub is_self: bool,
    pub selftext: Option<String>,
    pub media_urls: Vec<String>,
    pub comments: Vec<RedditComment>,
}

/// Output of the `fetch_subreddit` tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubredditPostsOutput {
    pub subreddit: String,
    pub sort: SubredditSort,
    pub time_filter: Option<TimeFilter>,
    pub posts: Vec<RedditPostSummary>,
    pub after_cursor: Option<String>,
    pub success: bool,
}

/// Output of the `fetch_subreddit_post` tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPostOutput {
    pub post: RedditPostDetail,
    pub success: bool,
}

fn str_field(data: &Value, key: &str) -> String {
    data.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn non_empty(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn author(data: &Value) -> String {
    non_empty(data, "author").unwrap_or_else(|| DELETED.to_string())
}

/// Children of a Listing object (`{"data": {"children": [...]}}`)
pub fn listing_children(listing: &Value) -> &[Value] {
    listing
        .pointer("/data/children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Build a summary from a `t3` child's `data` object
pub fn parse_post_summary(data: &Value) -> RedditPostSummary {
    let thumbnail = non_empty(data, "thumbnail").filter(|t| t != "self" && t != "default");

    RedditPostSummary {
        id: str_field(data, "id"),
        title: str_field(data, "title"),
        author: author(data),
        subreddit: str_field(data, "subreddit"),
        score: data.get("score").and_then(Value::as_i64).unwrap_or(0),
        num_comments: data.get("num_comments").and_then(Value::as_i64).unwrap_or(0),
        created_utc: data.get("created_utc").and_then(Value::as_f64).unwrap_or(0.0),
        url: str_field(data, "url"),
        permalink: str_field(data, "permalink"),
        is_self: data.get("is_self").and_then(Value::as_bool).unwrap_or(false),
        selftext: non_empty(data, "selftext"),
        thumbnail,
        link_flair_text: non_empty(data, "link_flair_text"),
    }
}

/// Parse all posts of a subreddit listing, returning them with the `after` cursor
pub fn parse_listing(listing: &Value) -> (Vec<RedditPostSummary>, Option<String>) {
    let posts = listing_children(listing)
        .iter()
        .filter(|c| c.get("kind").and_then(Value::as_str) == Some("t3"))
        .map(|c| parse_post_summary(c.get("data").unwrap_or(&NULL)))
        .collect();
    let after = listing
        .pointer("/data/after")
        .and_then(Value::as_str)
        .map(str::to_string);
    (posts, after)
}

/// Recursively parse comment children, skipping anything that is not a `t1`
/// (e.g. "load more" stubs)
pub fn parse_comments(children: &[Value]) -> Vec<RedditComment> {
    children
        .iter()
        .filter(|c| c.get("kind").and_then(Value::as_str) == Some("t1"))
        .map(|child| {
            let data = child.get("data").unwrap_or(&NULL);
            // `replies` is "" when there are none, a Listing otherwise
            let replies = data
                .get("replies")
                .filter(|r| r.is_object())
                .map(|r| parse_comments(listing_children(r)))
                .unwrap_or_default();

            RedditComment {
                id: str_field(data, "id"),
                author: author(data),
                body: str_field(data, "body"),
                parent_id: str_field(data, "parent_id"),
                created_utc: data.get("created_utc").and_then(Value::as_f64).unwrap_or(0.0),
                replies,
            }
        })
        .collect()
}

/// Collect image/video URLs from a post: direct links, galleries and previews
pub fn extract_media_urls(data: &Value) -> Vec<String> {
    let mut urls = Vec::new();

    if let Some(url) = data.get("url").and_then(Value::as_str) {
        let lower = url.to_lowercase();
        if MEDIA_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            urls.push(url.to_string());
        }
    }

    let is_gallery = data.get("is_gallery").and_then(Value::as_bool).unwrap_or(false);
    if is_gallery {
        if let Some(metadata) = data.get("media_metadata").and_then(Value::as_object) {
            for info in metadata.values() {
                if let Some(u) = info.pointer("/s/u").and_then(Value::as_str) {
                    urls.push(u.replace("&amp;", "&"));
                }
            }
        }
    }

    if let Some(images) = data.pointer("/preview/images").and_then(Value::as_array) {
        for image in images {
            if let Some(u) = image.pointer("/source/url").and_then(Value::as_str) {
                urls.push(u.replace("&amp;", "&"));
            }
        }
    }

    urls
}

/// Build a post detail from the two-listing `[post, comments]` response
pub fn parse_post_response(response: &Value) -> crate::Result<RedditPostDetail> {
    let listings = response
        .as_array()
        .filter(|a| a.len() == 2)
        .ok_or_else(|| Error::Upstream("Invalid Reddit API response format".to_string()))?;

    let post = listing_children(&listings[0])
        .first()
        .filter(|c| c.get("kind").and_then(Value::as_str) == Some("t3"))
        .and_then(|c| c.get("data"))
        .ok_or_else(|| Error::NotFound("Post not found in response".to_string()))?;

    Ok(RedditPostDetail {
        title: str_field(post, "title"),
        author: author(post),
        num_comments: post.get("num_comments").and_then(Value::as_i64).unwrap_or(0),
        created_utc: post.get("created_utc").and_then(Value::as_f64).unwrap_or(0.0),
        url: str_field(post, "url"),
        is_self: post.get("is_self").and_then(Value::as_bool).unwrap_or(false),
        selftext: non_empty(post, "selftext"),
        media_urls: extract_media_urls(post),
        comments: parse_comments(listing_children(&listings[1])),
    })
}
