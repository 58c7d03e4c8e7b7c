//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made while walking a viewer:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests for page markup and page images
//! - Classifying failures so the walker can report them

use crate::config::HttpConfig;
use crate::ManualError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// Response body
        body: Vec<u8>,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Response body, kept for diagnosing markup or server changes
        body: String,
    },

    /// Request could not complete (connection refused, timeout, etc.)
    NetworkError {
        /// The underlying client error
        error: reqwest::Error,
    },
}

impl FetchResult {
    /// Converts the result into the response body or a walk error for `url`
    pub fn into_body(self, url: &Url) -> Result<Vec<u8>, ManualError> {
        match self {
            Self::Success { body } => Ok(body),
            Self::HttpError { status_code, body } => Err(ManualError::Transport {
                url: url.to_string(),
                status: status_code,
                body,
            }),
            Self::NetworkError { error } => Err(ManualError::Network {
                url: url.to_string(),
                source: error,
            }),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Example
///
/// ```no_run
/// use manual_downloader::config::HttpConfig;
/// use manual_downloader::traversal::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once
///
/// There is no retry: any non-success status or network failure is returned
/// to the caller as-is.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(error) => return FetchResult::NetworkError { error },
    };

    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            body,
        };
    }

    tracing::trace!(
        "GET {} -> {} ({:?})",
        url,
        status.as_u16(),
        response.headers().get("content-type")
    );

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            body: body.to_vec(),
        },
        Err(error) => FetchResult::NetworkError { error },
    }
}
