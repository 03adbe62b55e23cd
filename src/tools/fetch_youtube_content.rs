//! YouTube transcript tool

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::required_str;
use super::traits::{Tool, ToolResult};
use crate::mcp::ToolAnnotations;
use crate::youtube::YouTubeTranscriber;
use crate::{Error, Result};

const MAX_INPUT_CHARS: usize = 200;

pub struct FetchYouTubeContentTool {
    transcriber: YouTubeTranscriber,
}

impl FetchYouTubeContentTool {
    pub fn new(transcriber: YouTubeTranscriber) -> Self {
        Self { transcriber }
    }
}

#[async_trait]
impl Tool for FetchYouTubeContentTool {
    fn name(&self) -> &str {
        "fetch_youtube_content"
    }

    fn description(&self) -> &str {
        "Get the transcript of a YouTube video by downloading its audio and running \
         speech-to-text. Accepts a video id or any YouTube URL. Can take several minutes \
         for long videos."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "video_id": {
                    "type": "string",
                    "description": "YouTube video id (e.g. 'dQw4w9WgXcQ') or video URL",
                    "minLength": 1,
                    "maxLength": MAX_INPUT_CHARS
                }
            },
            "required": ["video_id"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only("Fetch YouTube Transcript", false)
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let video_id = required_str(&args, "video_id", MAX_INPUT_CHARS)?;

        match self.transcriber.fetch_transcript(video_id).await {
            Ok(output) => ToolResult::success_from(&output),
            Err(e @ Error::InvalidArgument(_)) => Err(e),
            Err(e) => {
                warn!("Transcript for '{}' failed: {}", video_id, e);
                Ok(ToolResult::failure(format!("Failed to transcribe video: {}", e)))
            }
        }
    }
}
