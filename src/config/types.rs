use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Sitemap-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sitemap: SitemapConfig,
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub links: LinksConfig,
}

/// Where the seed URLs come from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// URL of the sitemap (or sitemap index) to crawl
    pub url: Option<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent requests; values below 1 are treated as 1
    pub throttle: i64,

    /// Host to send requests to instead of the one in the sitemap URLs
    pub host: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            throttle: 10,
            host: None,
        }
    }
}

/// HTTP request configuration handed to the fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Basic auth user
    pub user: Option<String>,

    /// Basic auth password
    pub password: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,

    /// Host override, copied from the crawler section at crawl time
    #[serde(skip)]
    pub host: Option<String>,

    /// Whether the fetcher should extract links from response bodies
    #[serde(skip)]
    pub parse_links: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user: None,
            password: None,
            timeout_secs: 30,
            user_agent: format!("sitemap-crawl/{}", env!("CARGO_PKG_VERSION")),
            headers: BTreeMap::new(),
            host: None,
            parse_links: false,
        }
    }
}

/// Link-following policy for the second crawl phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LinksConfig {
    /// Follow links pointing outside the crawled host
    pub crawl_external_links: bool,

    /// Follow `<a href>` links
    pub crawl_hyperlinks: bool,

    /// Follow `<img src>` links
    pub crawl_images: bool,
}

impl LinksConfig {
    /// Returns true if any kind of link following is enabled
    pub fn any(&self) -> bool {
        self.crawl_external_links || self.crawl_hyperlinks || self.crawl_images
    }

    /// A policy that follows nothing
    pub fn none() -> Self {
        Self::default()
    }
}
