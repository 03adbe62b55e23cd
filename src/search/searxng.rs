//! SearxNG client
//!
//! Thin wrapper over the SearxNG JSON API (`/search?format=json`).

use reqwest::Client;
use tracing::debug;

use super::models::{GeneralSearchResult, RawSearxngResponse, VideoSearchResult};
use crate::config::SearchConfig;
use crate::error::{Error, Result};

/// Client for interacting with a SearxNG instance
#[derive(Clone)]
pub struct SearxngClient {
    client: Client,
    config: SearchConfig,
}

impl SearxngClient {
    /// Create a new client. A missing host is reported on first use.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn host(&self) -> Result<&str> {
        self.config
            .searxng_host
            .as_deref()
            .map(|h| h.trim_end_matches('/'))
            .ok_or_else(|| Error::Config("SEARXNG_HOST is not configured".to_string()))
    }

    /// Perform a raw search, keeping at most `max_results` results
    pub async fn search_raw(
        &self,
        query: &str,
        engines: &[&str],
        categories: &[&str],
        max_results: Option<usize>,
    ) -> Result<RawSearxngResponse> {
        let mut params = vec![("q", query.to_string()), ("format", "json".to_string())];
        if !engines.is_empty() {
            params.push(("engines", engines.join(",")));
        }
        if !categories.is_empty() {
            params.push(("categories", categories.join(",")));
        }

        let url = url::Url::parse_with_params(&format!("{}/search", self.host()?), &params)
            .map_err(|e| Error::Config(format!("Invalid SearxNG host: {}", e)))?;

        debug!("SearxNG request: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::SearchRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SearchRequest(format!("SearxNG returned status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::SearchRequest(e.to_string()))?;

        let mut raw: RawSearxngResponse =
            serde_json::from_str(&body).map_err(|e| Error::SearchParse(e.to_string()))?;

        if let Some(max) = max_results {
            raw.results.truncate(max);
        }

        debug!("SearxNG returned {} results for '{}'", raw.results.len(), query);
        Ok(raw)
    }

    /// General web search. `max_results` defaults to the configured default
    /// and is capped at the configured maximum.
    pub async fn search_general(
        &self,
        query: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<GeneralSearchResult>> {
        let max = max_results
            .unwrap_or(self.config.default_general_results)
            .min(self.config.max_general_results);

        let raw = self.search_raw(query, &[], &[], Some(max)).await?;
        Ok(raw.results.into_iter().map(Into::into).collect())
    }

    /// Video search in the `videos` category on the given engines
    pub async fn search_videos(
        &self,
        query: &str,
        engines: &[&str],
        max_results: Option<usize>,
    ) -> Result<Vec<VideoSearchResult>> {
        let max = max_results
            .unwrap_or(self.config.default_video_results)
            .min(self.config.max_video_results);

        let raw = self.search_raw(query, engines, &["videos"], Some(max)).await?;
        Ok(raw.results.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SearxngClient {
        SearxngClient::new(SearchConfig {
            searxng_host: Some(server.uri()),
            ..SearchConfig::default()
        })
        .unwrap()
    }

    fn results(n: usize) -> serde_json::Value {
        let items: Vec<_> = (0..n)
            .map(|i| {
                serde_json::json!({
                    "url": format!("https://example.com/{}", i),
                    "title": format!("Result {}", i),
                    "content": "snippet",
                    "engine": "brave",
                    "score": 1.0 / (i as f64 + 1.0)
                })
            })
            .collect();
        serde_json::json!({ "query": "q", "number_of_results": 0, "results": items })
    }

    #[tokio::test]
    async fn test_general_search_caps_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust async"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(results(40)))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let capped = client.search_general("rust async", Some(100)).await.unwrap();
        assert_eq!(capped.len(), 25);

        let default = client.search_general("rust async", None).await.unwrap();
        assert_eq!(default.len(), 15);
        assert_eq!(default[2].score, Some(0.33));
    }

    #[tokio::test]
    async fn test_video_search_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("engines", "youtube"))
            .and(query_param("categories", "videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(results(3)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let videos = client.search_videos("lofi", &["youtube"], None).await.unwrap();
        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0].title, "Result 0");
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "down"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.search_general("broken", None).await,
            Err(Error::SearchParse(_))
        ));
        assert!(matches!(
            client.search_general("down", None).await,
            Err(Error::SearchRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_host() {
        let client = SearxngClient::new(SearchConfig::default()).unwrap();
        assert!(matches!(
            client.search_general("anything", None).await,
            Err(Error::Config(_))
        ));
    }
}
