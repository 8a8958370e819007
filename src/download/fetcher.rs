//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during a run:
//! - Building the HTTP client once with the tool's user agent string
//! - GET requests for the base page and for every asset
//! - Status validation and error classification

use crate::config::RunConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a single fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, protocol or body read failure
    #[error("transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// The server answered outside the 2xx range
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
        }
    }

    /// Returns true for connection and timeout failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Value of the `User-Agent` header sent with every request
/// * `timeout` - Optional total timeout per request; none by default
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```
/// use scrawl::config::DEFAULT_USER_AGENT;
/// use scrawl::download::build_http_client;
///
/// let client = build_http_client(DEFAULT_USER_AGENT, None).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &str,
    timeout: Option<Duration>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Performs GET requests with a client shared by every job
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Wraps an already built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from the run configuration
    pub fn from_config(config: &RunConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, config.timeout)?;
        Ok(Self::new(client))
    }

    /// Fetches a URL and returns the whole response body
    ///
    /// The body is buffered in memory with no size cap.
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The body of a 2xx response
    /// * `Err(FetchError::Status)` - The status was outside 200..=299
    /// * `Err(FetchError::Transport)` - The request or body read failed
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        tracing::trace!("Fetched {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}
