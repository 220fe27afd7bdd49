//! Sitemap-Crawl: a sitemap-driven crawl checker
//!
//! This crate fetches every URL listed in an XML sitemap under a throttle limit,
//! optionally follows one extra hop of discovered hyperlinks and images, and
//! reports status-code and latency statistics along with every failing URL.

pub mod config;
pub mod crawler;
pub mod interrupt;
pub mod output;
pub mod sitemap;
pub mod stats;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No URL crawled")]
    NothingCrawled,

    #[error("Some URLs had a different status code than 200 ({failed} of {total})")]
    PartialFailure { failed: u64, total: u64 },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Sitemap retrieval and parsing errors
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for sitemap {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read sitemap body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Invalid sitemap URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sitemap-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{async_crawl, crawl_sitemap, CrawlConfig, CrawlReport};
pub use interrupt::{InterruptSource, StopSignal};
pub use stats::{merge_crawl_stats, CrawlResult, CrawlStats};
