//! HTTP fetcher implementation
//!
//! This module defines the streaming fetch interface the crawl phases run on,
//! and its `reqwest` implementation:
//! - Building HTTP clients with the configured user agent, timeout and headers
//! - Throttled concurrent GET requests
//! - Server time capture per request
//! - Link extraction from HTML bodies when asked for
//! - Closing the result stream promptly on a stop signal

use crate::config::HttpConfig;
use crate::crawler::parser::extract_links;
use crate::interrupt::StopSignal;
use crate::url::override_host;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use url::Url;

/// Kind of reference found in a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// `<a href>`
    Hyperlink,
    /// `<img src>`
    Image,
}

/// A reference discovered inside a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute target URL
    pub target_url: Url,

    pub link_type: LinkType,

    /// True when the target is outside the host of the page it was found on
    pub is_external: bool,
}

/// Outcome of one attempted fetch
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The URL as it was handed to the fetcher
    pub url: String,

    /// HTTP status code, or 0 when no response was received
    pub status_code: u16,

    /// Time until the response headers arrived; None when no response was received
    pub server_time: Option<Duration>,

    /// When the fetch finished
    pub end_time: DateTime<Utc>,

    /// Links found in the body, only filled when link extraction is enabled
    pub links: Vec<Link>,
}

impl FetchOutcome {
    /// Outcome for a URL that produced no HTTP response
    pub fn failed(url: &str) -> Self {
        Self {
            url: url.to_string(),
            status_code: 0,
            server_time: None,
            end_time: Utc::now(),
            links: Vec::new(),
        }
    }
}

/// Receiving end of a fetch pass; closes once every URL was attempted or the
/// pass was stopped
pub type FetchStream = mpsc::Receiver<FetchOutcome>;

/// A service that fetches URLs concurrently and streams back the outcomes
///
/// Implementations must run at most `throttle` requests at a time, send one
/// outcome per attempted URL, and close the stream promptly after `stop`
/// fires. `fetch` is called from within a tokio runtime.
pub trait Fetcher: Send + Sync {
    fn fetch(
        &self,
        urls: Vec<String>,
        config: &HttpConfig,
        throttle: usize,
        stop: StopSignal,
    ) -> FetchStream;
}

/// Upper bound on the outcome channel capacity, whatever the throttle
const MAX_BUFFERED_OUTCOMES: usize = 1024;

/// [`Fetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Fetcher for ReqwestFetcher {
    fn fetch(
        &self,
        urls: Vec<String>,
        config: &HttpConfig,
        throttle: usize,
        stop: StopSignal,
    ) -> FetchStream {
        let throttle = throttle.max(1);
        let (tx, rx) = mpsc::channel(throttle.min(MAX_BUFFERED_OUTCOMES) * 2);
        let client = self.client.clone();
        let config = Arc::new(config.clone());

        tokio::spawn(async move {
            let mut outcomes = stream::iter(urls)
                .map(|url| {
                    let client = client.clone();
                    let config = config.clone();
                    async move { fetch_url(&client, &config, &url).await }
                })
                .buffer_unordered(throttle);

            loop {
                tokio::select! {
                    biased;

                    _ = stop.fired() => {
                        tracing::info!("Stop requested, closing fetch stream");
                        break;
                    }
                    next = outcomes.next() => match next {
                        Some(outcome) => {
                            if tx.send(outcome).await.is_err() {
                                tracing::debug!("Fetch stream receiver dropped");
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });

        rx
    }
}

/// Builds an HTTP client with proper configuration
///
/// Headers that are not valid HTTP header names or values are skipped with a
/// warning.
///
/// # Example
///
/// ```
/// use sitemap_crawl::config::HttpConfig;
/// use sitemap_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!("Skipping invalid header {}: {}", name, value),
        }
    }

    let timeout = Duration::from_secs(config.timeout_secs.max(1));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single URL
///
/// Never fails: transport errors produce an outcome with status code 0.
/// The body is only read when link extraction is enabled and the response is
/// a successful HTML page.
pub async fn fetch_url(client: &Client, config: &HttpConfig, url: &str) -> FetchOutcome {
    let page_url = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            tracing::error!("Invalid URL {}: {}", url, e);
            return FetchOutcome::failed(url);
        }
    };

    let request_url = match &config.host {
        Some(host) => match override_host(&page_url, host) {
            Ok(u) => u,
            Err(e) => {
                tracing::error!("Failed to apply host {} to {}: {}", host, url, e);
                return FetchOutcome::failed(url);
            }
        },
        None => page_url.clone(),
    };

    let mut request = client.get(request_url);
    if let Some(user) = &config.user {
        request = request.basic_auth(user, config.password.as_ref());
    }

    let start = Instant::now();
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            if e.is_timeout() {
                tracing::warn!("Request timeout for {}", url);
            } else if e.is_connect() {
                tracing::warn!("Connection failed for {}: {}", url, e);
            } else {
                tracing::warn!("Request failed for {}: {}", url, e);
            }
            return FetchOutcome::failed(url);
        }
    };
    let server_time = start.elapsed();
    let status = response.status();

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    let links = if config.parse_links && status.is_success() && is_html {
        match response.text().await {
            Ok(body) => extract_links(&body, &page_url),
            Err(e) => {
                tracing::debug!("Failed to read body of {}: {}", url, e);
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    FetchOutcome {
        url: url.to_string(),
        status_code: status.as_u16(),
        server_time: Some(server_time),
        end_time: Utc::now(),
        links,
    }
}
