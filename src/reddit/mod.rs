//! Reddit subreddit listings and post threads

mod client;
mod models;

pub use client::RedditClient;
pub use models::{
    extract_media_urls, parse_comments, parse_listing, parse_post_response, parse_post_summary,
    CommentSort, RedditComment, RedditPostDetail, RedditPostOutput, RedditPostSummary,
    SubredditPostsOutput, SubredditSort, TimeFilter,
};
