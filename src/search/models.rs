//! SearxNG response models and cleaned result types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Video length as reported by the engine: either preformatted (`"3:45"`)
/// or a number of seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaLength {
    Text(String),
    Seconds(f64),
}

/// One entry of the raw SearxNG `results` array.
///
/// Only the fields the tools use are decoded; SearxNG adds many more.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResult {
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub img_src: Option<String>,
    pub engine: Option<String>,
    #[serde(default)]
    pub engines: Vec<String>,
    pub score: Option<f64>,
    pub category: Option<String>,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
    pub length: Option<MediaLength>,
    pub duration: Option<MediaLength>,
    pub author: Option<String>,
}

/// Raw SearxNG JSON response
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearxngResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub number_of_results: f64,
    #[serde(default)]
    pub results: Vec<RawResult>,
    #[serde(default)]
    pub answers: Vec<Value>,
    #[serde(default)]
    pub corrections: Vec<Value>,
    #[serde(default)]
    pub infoboxes: Vec<Value>,
    #[serde(default)]
    pub suggestions: Vec<Value>,
    #[serde(default)]
    pub unresponsive_engines: Vec<Value>,
}

/// A cleaned general web search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSearchResult {
    pub title: String,
    pub url: String,
    pub content: Option<String>,
    pub score: Option<f64>,
    pub category: Option<String>,
    pub author: Option<String>,
}

/// A cleaned video search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSearchResult {
    pub title: String,
    pub url: String,
    pub content: Option<String>,
    pub published_date: Option<String>,
    pub duration: Option<MediaLength>,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
}

impl From<RawResult> for GeneralSearchResult {
    fn from(r: RawResult) -> Self {
        GeneralSearchResult {
            title: r.title,
            url: r.url,
            content: r.content,
            score: r.score.map(round2),
            category: r.category,
            author: r.author,
        }
    }
}

impl From<RawResult> for VideoSearchResult {
    fn from(r: RawResult) -> Self {
        VideoSearchResult {
            title: r.title,
            url: r.url,
            content: r.content,
            published_date: r.published_date,
            duration: r.length.or(r.duration),
            author: r.author,
            thumbnail: r.img_src.or(r.thumbnail),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_raw_response() {
        let json = serde_json::json!({
            "query": "rust",
            "number_of_results": 0,
            "results": [{
                "url": "https://www.rust-lang.org/",
                "title": "Rust",
                "content": "A language empowering everyone",
                "engine": "duckduckgo",
                "engines": ["duckduckgo", "brave"],
                "score": 3.14159,
                "category": "general",
                "parsed_url": ["https", "www.rust-lang.org", "/", "", "", ""],
                "positions": [1, 2]
            }],
            "unresponsive_engines": [["google", "timeout"]]
        });

        let raw: RawSearxngResponse = serde_json::from_value(json).unwrap();
        assert_eq!(raw.results.len(), 1);
        assert_eq!(raw.unresponsive_engines.len(), 1);

        let cleaned: GeneralSearchResult = raw.results[0].clone().into();
        assert_eq!(cleaned.score, Some(3.14));
        assert_eq!(cleaned.category.as_deref(), Some("general"));
    }

    #[test]
    fn test_video_prefers_length_and_img_src() {
        let raw: RawResult = serde_json::from_value(serde_json::json!({
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "title": "Video",
            "length": "3:33",
            "duration": 213.0,
            "img_src": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
            "thumbnail": "https://example.com/other.jpg",
            "publishedDate": "2009-10-25T06:57:33"
        }))
        .unwrap();

        let video: VideoSearchResult = raw.into();
        assert_eq!(video.duration, Some(MediaLength::Text("3:33".into())));
        assert_eq!(video.thumbnail.as_deref(), Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"));
        assert_eq!(video.published_date.as_deref(), Some("2009-10-25T06:57:33"));
    }

    #[test]
    fn test_video_falls_back_to_duration() {
        let raw: RawResult = serde_json::from_value(serde_json::json!({
            "url": "https://www.youtube.com/watch?v=abc",
            "title": "Video",
            "duration": 95.5
        }))
        .unwrap();

        let video: VideoSearchResult = raw.into();
        assert_eq!(video.duration, Some(MediaLength::Seconds(95.5)));
        assert!(video.thumbnail.is_none());
    }
}
