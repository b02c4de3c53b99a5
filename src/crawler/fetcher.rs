//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Error classification (HTTP status vs. network failure)
//!
//! Fetching sits behind the [`Fetcher`] trait so the scheduler can be driven
//! by any transport. No retries are performed; a failed fetch is final.
//! Redirects are not followed here: a 3xx comes back as
//! [`FetchError::Redirect`] and the scheduler decides whether its target
//! belongs to the crawl.

use crate::config::UserAgentConfig;
use crate::FetchError;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// A successfully fetched response body
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested (the frontier key)
    pub url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    /// Raw response body
    pub body: Vec<u8>,
}

/// Something that can turn a URL into response bytes
///
/// Implementations must map redirects to [`FetchError::Redirect`], other
/// non-success HTTP statuses to [`FetchError::Status`] and transport failures
/// to [`FetchError::Network`].
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_cartographer::config::UserAgentConfig;
/// use site_cartographer::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher identifying itself with the configured user agent
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_network_error(url, &e))?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok());

            if let Some(location) = location {
                return Err(FetchError::Redirect {
                    url: url.to_string(),
                    status: status.as_u16(),
                    location: location.to_string(),
                });
            }
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_network_error(url, &e))?;

        Ok(FetchedPage {
            url: url.clone(),
            status_code: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

fn classify_network_error(url: &Url, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}
