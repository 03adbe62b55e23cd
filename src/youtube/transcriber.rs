//! OpenAI-compatible speech-to-text client

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::{debug, info};

use crate::config::SttConfig;
use crate::error::{Error, Result};

/// Client for `POST {endpoint}/audio/transcriptions`
#[derive(Clone)]
pub struct SttClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
}

impl SttClient {
    /// Requires both an endpoint and a model
    pub fn new(config: &SttConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::Config("STT_ENDPOINT is not configured".to_string()))?;
        let model = config
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| Error::Config("STT_MODEL is not configured".to_string()))?;

        Ok(Self {
            client: Client::builder().timeout(config.timeout).build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Transcribe an audio file and return the plain text
    pub async fn transcribe(&self, audio: &Path) -> Result<String> {
        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.opus")
            .to_string();

        debug!("Uploading {} ({} bytes) for transcription", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(audio))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "text");

        let mut request = self
            .client
            .post(format!("{}/audio/transcriptions", self.endpoint))
            .multipart(form);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout("Transcription request timed out".to_string())
            } else {
                Error::Transcription(format!("Transcription request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Transcription(format!(
                "STT endpoint returned {}: {}",
                status,
                body.trim()
            )));
        }

        let transcript = transcript_from_body(&body);
        info!("Transcribed {} chars", transcript.chars().count());
        Ok(transcript)
    }
}

/// Servers asked for `text` usually answer with plain text, but some still
/// wrap it as `{"text": ...}`
fn transcript_from_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("text").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
        .trim()
        .to_string()
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("opus") | Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        Some("webm") => "audio/webm",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> SttConfig {
        SttConfig {
            endpoint: Some(format!("{}/v1/", server.uri())),
            model: Some("whisper-1".to_string()),
            api_key: Some(SecretString::from("sk-test".to_string())),
            ..SttConfig::default()
        }
    }

    #[test]
    fn test_requires_endpoint_and_model() {
        assert!(matches!(SttClient::new(&SttConfig::default()), Err(Error::Config(_))));

        let config = SttConfig {
            endpoint: Some("http://stt:8000/v1".to_string()),
            model: Some("  ".to_string()),
            ..SttConfig::default()
        };
        assert!(matches!(SttClient::new(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_transcript_from_body() {
        assert_eq!(transcript_from_body("  hello world\n"), "hello world");
        assert_eq!(transcript_from_body(r#"{"text": " hi "}"#), "hi");
    }

    #[tokio::test]
    async fn test_transcribe() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("never gonna give you up\n"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let audio = dir.path().join("audio_1.opus");
        std::fs::write(&audio, b"OggS fake").unwrap();

        let client = SttClient::new(&config_for(&server)).unwrap();
        let text = client.transcribe(&audio).await.unwrap();
        assert_eq!(text, "never gonna give you up");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"model\""));
        assert!(body.contains("whisper-1"));
        assert!(body.contains("name=\"response_format\""));
    }

    #[tokio::test]
    async fn test_transcribe_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let audio = dir.path().join("audio_2.opus");
        std::fs::write(&audio, b"OggS").unwrap();

        let client = SttClient::new(&config_for(&server)).unwrap();
        match client.transcribe(&audio).await {
            Err(Error::Transcription(msg)) => assert!(msg.contains("model not loaded")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
