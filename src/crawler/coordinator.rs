//! Crawler coordinator - crawl orchestration logic
//!
//! This module sequences a crawl invocation:
//! - Correcting the throttle and deriving the link extraction flag
//! - Running the first phase over the seed URLs
//! - Selecting and running the second phase over discovered links
//! - Attaching referrers to second-phase failures
//! - Merging both phases into the final statistics

use crate::config::{Config, HttpConfig, LinksConfig};
use crate::crawler::fetcher::{build_http_client, FetchOutcome, Fetcher};
use crate::crawler::links::expand_links;
use crate::crawler::phase::run_phase;
use crate::interrupt::{InterruptSource, StopSignal};
use crate::sitemap::extract_seed_urls;
use crate::stats::{merge_crawl_stats, CrawlStats};
use crate::CrawlError;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for one crawl invocation
#[derive(Clone)]
pub struct CrawlConfig {
    /// Maximum number of concurrent requests; values below 1 are treated as 1
    pub throttle: i64,

    /// Host to send requests to instead of the one in the URLs
    pub host: Option<String>,

    /// Request settings handed to the fetcher
    pub http: HttpConfig,

    /// Which discovered links get a second fetch
    pub links: LinksConfig,

    pub fetcher: Arc<dyn Fetcher>,
}

impl CrawlConfig {
    /// Creates a configuration with default settings around `fetcher`
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::from_config(&Config::default(), fetcher)
    }

    /// Creates a configuration from a loaded config file
    pub fn from_config(config: &Config, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            throttle: config.crawler.throttle,
            host: config.crawler.host.clone(),
            http: config.http.clone(),
            links: config.links,
            fetcher,
        }
    }
}

/// What a crawl invocation produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Merged statistics of both phases
    pub stats: CrawlStats,

    /// True if the crawl was halted by an interrupt
    pub stopped: bool,
}

impl CrawlReport {
    /// Overall pass/fail of the crawl
    ///
    /// Independent of [`stopped`](Self::stopped): a stopped crawl whose
    /// crawled URLs all answered 200 still passes.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every crawled URL answered 200
    /// * `Err(CrawlError::NothingCrawled)` - No URL was crawled
    /// * `Err(CrawlError::PartialFailure)` - Some URLs answered something else
    pub fn verdict(&self) -> Result<(), CrawlError> {
        if self.stats.total == 0 {
            return Err(CrawlError::NothingCrawled);
        }

        if self.stats.total != self.stats.count_200() {
            return Err(CrawlError::PartialFailure {
                failed: self.stats.count_non_200(),
                total: self.stats.total,
            });
        }

        Ok(())
    }
}

/// Crawls `urls`, then optionally one hop of the links found in them
///
/// # Arguments
///
/// * `urls` - The seed URLs
/// * `config` - The crawl configuration
/// * `stop` - Signal that halts the crawl when fired
///
/// # Returns
///
/// The merged statistics and whether the crawl was stopped early. Call
/// [`CrawlReport::verdict`] for the pass/fail determination.
pub async fn async_crawl(urls: Vec<String>, mut config: CrawlConfig, stop: &StopSignal) -> CrawlReport {
    let throttle = effective_throttle(config.throttle);
    config.http.parse_links = config.links.any();
    config.http.host = config.host.clone();

    tracing::info!("Crawling {} URLs with throttle {}", urls.len(), throttle);

    let seeds = run_phase(
        urls.clone(),
        &config.http,
        throttle,
        config.fetcher.as_ref(),
        stop,
    )
    .await;

    let mut stats = seeds.stats;
    let mut success_time_sum = seeds.success_time_sum;
    let mut stopped = seeds.stopped;

    if config.http.parse_links {
        if stopped {
            tracing::info!("Skipping linked URLs after stop");
        } else {
            let (links_stats, links_time_sum, links_stopped) =
                crawl_links(&seeds.results, &urls, &config, throttle, stop).await;

            stats = merge_crawl_stats(&stats, &links_stats);
            success_time_sum += links_time_sum;
            stopped = links_stopped;
        }
    }

    stats.finalize_average(success_time_sum);

    tracing::info!(
        "Crawl finished: {} URLs, {} non-200{}",
        stats.total,
        stats.count_non_200(),
        if stopped { " (stopped)" } else { "" }
    );

    CrawlReport { stats, stopped }
}

/// Crawls the links discovered in the first phase
///
/// Link extraction is off for this phase so no third hop happens.
async fn crawl_links(
    source_results: &[FetchOutcome],
    source_urls: &[String],
    config: &CrawlConfig,
    throttle: usize,
    stop: &StopSignal,
) -> (CrawlStats, Duration, bool) {
    let expansion = expand_links(source_results, source_urls, &config.links);
    if expansion.is_empty() {
        tracing::info!("No linked URLs to crawl");
        return (CrawlStats::default(), Duration::ZERO, false);
    }

    tracing::info!("Crawling {} linked URLs", expansion.len());

    let mut links_http = config.http.clone();
    links_http.parse_links = false;

    let linked = run_phase(
        expansion.urls(),
        &links_http,
        throttle,
        config.fetcher.as_ref(),
        stop,
    )
    .await;

    let mut stats = linked.stats;
    expansion.annotate(&mut stats);

    (stats, linked.success_time_sum, linked.stopped)
}

/// Corrects a throttle below 1 to 1
fn effective_throttle(throttle: i64) -> usize {
    if throttle <= 0 {
        tracing::warn!("Invalid throttle value {}, defaulting to 1", throttle);
        return 1;
    }
    usize::try_from(throttle).unwrap_or(usize::MAX)
}

/// Runs a complete crawl from a sitemap
///
/// This is the main entry point for a crawl. It will:
/// 1. Start listening for SIGINT/SIGTERM
/// 2. Retrieve the seed URLs from the sitemap
/// 3. Run [`async_crawl`] over them
///
/// # Arguments
///
/// * `sitemap_url` - URL of the sitemap or sitemap index
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran; check [`CrawlReport::verdict`]
/// * `Err(CrawlError)` - The sitemap could not be retrieved
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sitemap_crawl::config::HttpConfig;
/// use sitemap_crawl::crawler::{crawl_sitemap, CrawlConfig, ReqwestFetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = ReqwestFetcher::new(&HttpConfig::default())?;
/// let config = CrawlConfig::new(Arc::new(fetcher));
/// let report = crawl_sitemap("https://example.com/sitemap.xml", config).await?;
/// report.verdict()?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl_sitemap(sitemap_url: &str, config: CrawlConfig) -> Result<CrawlReport, CrawlError> {
    let interrupt = InterruptSource::listen();
    let client = build_http_client(&config.http)?;

    let urls = extract_seed_urls(&client, sitemap_url).await?;
    tracing::info!("Found {} URLs in {}", urls.len(), sitemap_url);

    Ok(async_crawl(urls, config, &interrupt.signal()).await)
}
