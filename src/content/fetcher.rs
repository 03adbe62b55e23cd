//! Web content fetcher
//!
//! Fetches a page directly and extracts its text. PDFs, HTTP errors and
//! timeouts are routed through a reader service (Jina Reader by default)
//! which returns the document as plain text.

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect, Client, Proxy};
use tracing::{debug, info, warn};

use super::html::extract_text;
use super::paginator::{paginate, ContentChunk, CHUNK_SIZE};
use crate::config::FetchConfig;
use crate::error::{Error, Result};

/// Maximum redirects followed on a direct fetch
const MAX_REDIRECTS: usize = 10;

/// Fetches web pages and returns their text content
#[derive(Clone)]
pub struct WebContentFetcher {
    client: Client,
    config: FetchConfig,
}

impl WebContentFetcher {
    /// Create a fetcher, routing through `config.proxy_url` when set
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS));

        if let Some(ref proxy) = config.proxy_url {
            let proxy = Proxy::all(proxy.as_str())
                .map_err(|e| Error::Config(format!("Invalid proxy URL '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Fetch `url` and return the chunk starting at `offset`.
    pub async fn fetch_page(&self, url: &str, offset: i64) -> Result<ContentChunk> {
        if offset < 0 {
            return Err(Error::InvalidArgument(format!(
                "offset must be non-negative, got {}",
                offset
            )));
        }

        let text = self.fetch_text(url).await?;
        paginate(&text, offset, CHUNK_SIZE)
    }

    /// Fetch `url` and return the full extracted text.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url.trim())
            .map_err(|e| Error::InvalidArgument(format!("Invalid URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidArgument(format!(
                "Unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }
        let url = parsed.as_str();

        if is_pdf_url(url) {
            debug!("{} looks like a PDF, using reader", url);
            return self.fetch_via_reader(url).await;
        }

        let response = match self
            .client
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Direct fetch of {} failed ({}), falling back to reader", url, e);
                return self.fetch_via_reader(url).await;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Direct fetch of {} returned {}, falling back to reader", url, status);
            return self.fetch_via_reader(url).await;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Reading body of {} failed ({}), falling back to reader", url, e);
                return self.fetch_via_reader(url).await;
            }
        };

        if is_pdf_content(&content_type, &body) {
            debug!("{} served a PDF, using reader", url);
            return self.fetch_via_reader(url).await;
        }

        let html = String::from_utf8_lossy(&body);
        let text = extract_text(&html);
        info!("Fetched {} ({} chars)", url, text.chars().count());
        Ok(text)
    }

    /// Fetch through the reader service, which returns plain text
    async fn fetch_via_reader(&self, url: &str) -> Result<String> {
        let reader_url = format!("{}/{}", self.config.reader_base_url.trim_end_matches('/'), url);

        let response = self
            .client
            .get(&reader_url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to fetch via reader: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "Failed to fetch via reader: status {}",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read reader response: {}", e)))?;

        info!("Fetched {} via reader ({} chars)", url, text.chars().count());
        Ok(text)
    }
}

/// Check if a URL points to a PDF based on its shape
pub fn is_pdf_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.ends_with(".pdf") || lower.contains(".pdf?") || lower.contains(".pdf#") || lower.contains("/pdf/")
}

/// Check if a response is a PDF based on its content type or magic bytes
pub fn is_pdf_content(content_type: &str, body: &[u8]) -> bool {
    content_type.to_lowercase().contains("application/pdf") || body.starts_with(b"%PDF")
}
