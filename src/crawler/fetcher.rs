//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests for one browse page at a time
//! - Classifying failures so callers can degrade instead of abort

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::index::PageRequest;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Result of a fetch operation
///
/// Exactly one of content or a failure; a failed fetch never carries a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The server answered 200 with a body
    Success {
        /// Page body content
        body: String,
    },

    /// The server answered with anything other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// No usable response (timeout, DNS, connection reset, body read error)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the fetch produced content
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Consumes the result, returning the body if there was one
    pub fn into_content(self) -> Option<String> {
        match self {
            Self::Success { body } => Some(body),
            Self::HttpError { .. } | Self::NetworkError { .. } => None,
        }
    }
}

/// Retrieves one browse page
///
/// Implementations must never fail the crawl: every problem is reported as
/// a non-success [`FetchResult`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &PageRequest) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Timeouts are taken from here
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use lexicon_harvest::config::{CrawlerConfig, UserAgentConfig};
/// use lexicon_harvest::crawler::build_http_client;
///
/// let client =
///     build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(crawler.request_timeout())
        .connect_timeout(crawler.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches browse pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher from an existing client
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Builds a client from the configuration and wraps it
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        Ok(Self::new(client, config.crawler.base_url.clone()))
    }

    /// Returns the site root requests are built from
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &PageRequest) -> FetchResult {
        let url = request.url(&self.base_url);
        tracing::debug!("Fetching URL: {}", url);

        let result = fetch_url(&self.client, &url).await;
        match &result {
            FetchResult::Success { .. } => {}
            FetchResult::HttpError { status_code } => {
                tracing::warn!(
                    namespace = %request.namespace,
                    key = %request.key,
                    page = request.page,
                    "Could not retrieve {}: status code {}",
                    url,
                    status_code
                );
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!(
                    namespace = %request.namespace,
                    key = %request.key,
                    page = request.page,
                    "Could not retrieve {}: {}",
                    url,
                    error
                );
            }
        }
        result
    }
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 with readable body | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError ("Request timeout") |
/// | Connection failure | NetworkError ("Connection failed") |
/// | Body read failure, other errors | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            tracing::debug!("Response code: {}", status.as_u16());

            if status != StatusCode::OK {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success { body },
                Err(e) => FetchResult::NetworkError {
                    error: format!("Failed to read body: {}", e),
                },
            }
        }
        Err(e) => {
            // Classify error
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: format!("Connection failed: {}", e),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}
