//! YouTube transcript pipeline
//!
//! `yt-dlp` pulls the audio track into a scratch directory, which is then
//! sent to an OpenAI-compatible speech-to-text endpoint.

mod downloader;
mod transcriber;
mod video_id;

pub use downloader::{watch_url, AudioDownloader};
pub use transcriber::SttClient;
pub use video_id::parse_video_id;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SttConfig;
use crate::error::{Error, Result};

/// Output of the `fetch_youtube_content` tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YouTubeContentOutput {
    pub video_id: String,
    pub transcript: String,
    pub transcript_length: usize,
    pub success: bool,
}

/// Downloads a video's audio and transcribes it.
///
/// Settings are checked per call so the server can start without STT
/// configured.
#[derive(Debug, Clone)]
pub struct YouTubeTranscriber {
    config: SttConfig,
}

impl YouTubeTranscriber {
    pub fn new(config: SttConfig) -> Self {
        Self { config }
    }

    /// Transcribe the video identified by `input` (id or URL)
    pub async fn fetch_transcript(&self, input: &str) -> Result<YouTubeContentOutput> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::InvalidArgument("video_id must not be empty".to_string()));
        }

        let stt = SttClient::new(&self.config)?;
        let downloader = AudioDownloader::locate(
            self.config.yt_dlp_path.as_deref(),
            self.config.download_timeout,
        )?;

        // Inputs only yt-dlp can interpret are downloaded as given
        let (video_id, source) = match parse_video_id(input) {
            Some(id) => {
                let url = watch_url(&id);
                (id, url)
            }
            None => (downloader.resolve_id(input).await?, input.to_string()),
        };

        // Removed on drop, whichever way this function returns
        let scratch = tempfile::Builder::new().prefix("webintel-yt-").tempdir()?;
        let audio = downloader.download_audio(&source, scratch.path()).await?;
        let transcript = stt.transcribe(&audio).await?;

        info!("Transcript for {}: {} chars", video_id, transcript.chars().count());

        Ok(YouTubeContentOutput {
            video_id,
            transcript_length: transcript.chars().count(),
            transcript,
            success: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_stt_config() {
        let transcriber = YouTubeTranscriber::new(SttConfig::default());
        assert!(matches!(
            transcriber.fetch_transcript("dQw4w9WgXcQ").await,
            Err(Error::Config(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolved_url_downloaded_as_given() {
        let bin = tempfile::TempDir::new().unwrap();
        let (script, log) = downloader::tests::fake_yt_dlp(bin.path(), "123456789");

        let transcriber = YouTubeTranscriber::new(SttConfig {
            endpoint: Some("http://127.0.0.1:9/v1".to_string()),
            model: Some("whisper-1".to_string()),
            yt_dlp_path: Some(script),
            ..SttConfig::default()
        });

        // The fake never writes audio, so the pipeline stops after download
        assert!(matches!(
            transcriber.fetch_transcript("https://vimeo.com/123456789").await,
            Err(Error::Transcription(_))
        ));

        let argv = std::fs::read_to_string(&log).unwrap();
        let download = argv.lines().nth(1).unwrap();
        assert!(download.ends_with("-- https://vimeo.com/123456789"));
        assert!(!download.contains("youtube.com"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_known_id_downloaded_from_watch_url() {
        let bin = tempfile::TempDir::new().unwrap();
        let (script, log) = downloader::tests::fake_yt_dlp(bin.path(), "unused");

        let transcriber = YouTubeTranscriber::new(SttConfig {
            endpoint: Some("http://127.0.0.1:9/v1".to_string()),
            model: Some("whisper-1".to_string()),
            yt_dlp_path: Some(script),
            ..SttConfig::default()
        });

        let _ = transcriber.fetch_transcript("https://youtu.be/dQw4w9WgXcQ").await;

        let argv = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = argv.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("-- https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn test_blank_input() {
        let transcriber = YouTubeTranscriber::new(SttConfig::default());
        assert!(matches!(
            transcriber.fetch_transcript("   ").await,
            Err(Error::InvalidArgument(_))
        ));
    }
}
