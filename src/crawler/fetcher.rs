//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with query parameters
//! - Redirect detection (a redirect is how the site says "no such book")
//! - Error classification into status, transient and other failures
//!
//! No retry happens here; retrying is the caller's policy.

use crate::config::UserAgentConfig;
use crate::CrawlError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched response body
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// Raw body bytes
    pub body: Vec<u8>,

    /// URL the body was actually served from
    pub final_url: Url,

    /// True if one or more redirects happened before the body was served
    pub redirected: bool,
}

impl FetchedResponse {
    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout; connect timeout is capped at 10s
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tululu_ripple::config::UserAgentConfig;
/// use tululu_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Thin GET wrapper around a shared [`Client`]
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` with the given query parameters
    ///
    /// # Error Classification
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | HTTP status >= 400 | `HttpStatus` |
    /// | Connection refused / timeout | `TransientNetwork` |
    /// | Anything else from the client | `Http` |
    ///
    /// Redirects are followed and reported through
    /// [`FetchedResponse::redirected`], never as an error.
    pub async fn get(
        &self,
        url: &Url,
        query: &[(&str, &str)],
    ) -> Result<FetchedResponse, CrawlError> {
        let request = self
            .client
            .get(url.clone())
            .query(query)
            .build()
            .map_err(|e| classify_error(url, e))?;
        let requested_url = request.url().clone();

        tracing::debug!(url = %requested_url, "GET");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| classify_error(&requested_url, e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(CrawlError::HttpStatus {
                url: requested_url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let redirected = final_url != requested_url;
        if redirected {
            tracing::debug!(from = %requested_url, to = %final_url, "Request was redirected");
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(&requested_url, e))?
            .to_vec();

        Ok(FetchedResponse {
            body,
            final_url,
            redirected,
        })
    }
}

/// Maps a client error onto the crawl error taxonomy
///
/// Timeouts, refused connections and connections dropped before a complete
/// response arrived are all transient. Builder, redirect-limit and decode
/// errors are not.
fn classify_error(url: &Url, error: reqwest::Error) -> CrawlError {
    let message = if error.is_timeout() {
        "Request timeout"
    } else if error.is_connect() {
        "Connection refused"
    } else if error.is_request() || error.is_body() || has_io_source(&error) {
        "Connection dropped"
    } else {
        return CrawlError::Http {
            url: url.to_string(),
            source: error,
        };
    };

    tracing::debug!(url = %url, "Transient failure: {}", error);
    CrawlError::TransientNetwork {
        url: url.to_string(),
        message: message.to_string(),
    }
}

/// True if any error in the source chain is an IO error (reset, broken pipe...)
fn has_io_source(error: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        if cause.is::<std::io::Error>() {
            return true;
        }
        source = cause.source();
    }
    false
}
