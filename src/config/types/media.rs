//! YouTube / speech-to-text and Reddit configuration types

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Speech-to-text configuration for the YouTube transcript pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// OpenAI-compatible base URL (e.g. `http://whisper:8000/v1`)
    pub endpoint: Option<String>,
    /// Transcription model name
    pub model: Option<String>,
    /// API key sent as a bearer token
    #[serde(skip_serializing, default)]
    pub api_key: Option<SecretString>,
    /// Explicit path to `yt-dlp`; looked up in PATH when unset
    pub yt_dlp_path: Option<PathBuf>,
    /// Timeout for the transcription request
    #[serde(with = "humantime_serde", default = "default_stt_timeout")]
    pub timeout: Duration,
    /// Timeout for the audio download
    #[serde(with = "humantime_serde", default = "default_download_timeout")]
    pub download_timeout: Duration,
}

impl Default for SttConfig {
    fn default() -> Self {
        SttConfig {
            endpoint: None,
            model: None,
            api_key: None,
            yt_dlp_path: None,
            timeout: default_stt_timeout(),
            download_timeout: default_download_timeout(),
        }
    }
}

fn default_stt_timeout() -> Duration {
    Duration::from_secs(600)
}

fn default_download_timeout() -> Duration {
    Duration::from_secs(300)
}

/// Reddit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    /// JSON API base URL
    #[serde(default = "default_reddit_url")]
    pub base_url: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        RedditConfig {
            base_url: default_reddit_url(),
        }
    }
}

fn default_reddit_url() -> String {
    "https://old.reddit.com".to_string()
}
