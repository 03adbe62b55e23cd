//! Search and fetch configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// SearxNG configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the SearxNG instance (e.g. `http://searxng:8080`)
    pub searxng_host: Option<String>,
    /// Request timeout
    #[serde(with = "humantime_serde", default = "default_search_timeout")]
    pub timeout: Duration,
    /// Upper bound for general search results
    #[serde(default = "default_max_general")]
    pub max_general_results: usize,
    /// Upper bound for video search results
    #[serde(default = "default_max_video")]
    pub max_video_results: usize,
    /// Results returned when the caller does not ask for a count
    #[serde(default = "default_general")]
    pub default_general_results: usize,
    /// Video results returned when the caller does not ask for a count
    #[serde(default = "default_video")]
    pub default_video_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            searxng_host: None,
            timeout: default_search_timeout(),
            max_general_results: default_max_general(),
            max_video_results: default_max_video(),
            default_general_results: default_general(),
            default_video_results: default_video(),
        }
    }
}

fn default_search_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_general() -> usize {
    25
}

fn default_max_video() -> usize {
    20
}

fn default_general() -> usize {
    15
}

fn default_video() -> usize {
    10
}

/// Web content fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout (direct fetch and reader fallback)
    #[serde(with = "humantime_serde", default = "default_fetch_timeout")]
    pub timeout: Duration,
    /// User-Agent sent on direct fetches
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Optional proxy all outbound fetches are routed through
    pub proxy_url: Option<String>,
    /// Reader service used for PDFs and failed direct fetches
    #[serde(default = "default_reader_url")]
    pub reader_base_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
            proxy_url: None,
            reader_base_url: default_reader_url(),
        }
    }
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_reader_url() -> String {
    "https://r.jina.ai".to_string()
}
