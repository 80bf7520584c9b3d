//! HTTP fetcher implementation
//!
//! The crawl engine only needs a `fetch(url) -> HTML | error` capability;
//! this module defines that capability as the [`Fetcher`] trait and
//! provides the production implementation backed by a single shared
//! `reqwest::Client`. One pooled client serves every fetch in the process
//! rather than standing up a fresh transport per page.

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Per-fetch failure kinds
///
/// Every variant is isolated to the URL that produced it; the engine logs
/// the failure and the crawl moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("not an HTML page (content-type: {0})")]
    NotHtml(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Page-fetch capability
///
/// Implementations return the final rendered HTML for a URL or fail
/// cleanly. Each call is independent; implementations must be safe to
/// call from concurrent workers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Builds an HTTP client presenting a realistic browser identity
///
/// # Arguments
///
/// * `config` - Browser identity settings (user-agent, Accept-Language)
/// * `timeout` - Request deadline applied at the client level
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    config: &FetcherConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production fetcher backed by one shared connection pool
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given browser identity and deadline
    pub fn new(config: &FetcherConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Servers that omit the header get the benefit of the doubt.
        if !content_type.is_empty() && !content_type.contains("text/html") {
            return Err(FetchError::NotHtml(content_type));
        }

        response.text().await.map_err(classify_error)
    }
}

/// Maps a reqwest error onto the fetch failure kinds
fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Transport(error.to_string())
    }
}
