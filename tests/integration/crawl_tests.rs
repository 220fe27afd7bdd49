use chrono::Utc;
use sitemap_crawl::config::{HttpConfig, LinksConfig};
use sitemap_crawl::crawler::{
    async_crawl, CrawlConfig, FetchOutcome, FetchStream, Fetcher, Link, LinkType,
};
use sitemap_crawl::interrupt::{InterruptSource, StopSignal};
use sitemap_crawl::CrawlError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

/// A recorded call to the scripted fetcher
#[derive(Debug, Clone)]
struct FetchCall {
    urls: Vec<String>,
    throttle: usize,
    parse_links: bool,
    host: Option<String>,
}

/// Answers from a fixed table; unknown URLs answer 404
///
/// Links are only attached when the call asks for link extraction, like a
/// real fetcher would.
#[derive(Default)]
struct ScriptedFetcher {
    responses: HashMap<String, (u16, Duration, Vec<Link>)>,
    calls: Mutex<Vec<FetchCall>>,
}

impl ScriptedFetcher {
    fn respond(mut self, url: &str, status_code: u16, millis: u64) -> Self {
        self.responses.insert(
            url.to_string(),
            (status_code, Duration::from_millis(millis), Vec::new()),
        );
        self
    }

    fn respond_with_links(mut self, url: &str, status_code: u16, millis: u64, links: Vec<Link>) -> Self {
        self.responses.insert(
            url.to_string(),
            (status_code, Duration::from_millis(millis), links),
        );
        self
    }

    fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(
        &self,
        urls: Vec<String>,
        config: &HttpConfig,
        throttle: usize,
        stop: StopSignal,
    ) -> FetchStream {
        self.calls.lock().unwrap().push(FetchCall {
            urls: urls.clone(),
            throttle,
            parse_links: config.parse_links,
            host: config.host.clone(),
        });

        let (tx, rx) = mpsc::channel(urls.len().max(1));
        if stop.is_fired() {
            return rx;
        }

        for url in urls {
            let (status_code, time, links) = self
                .responses
                .get(&url)
                .cloned()
                .unwrap_or((404, Duration::from_millis(1), Vec::new()));

            tx.try_send(FetchOutcome {
                url,
                status_code,
                server_time: Some(time),
                end_time: Utc::now(),
                links: if config.parse_links { links } else { Vec::new() },
            })
            .unwrap();
        }
        rx
    }
}

fn link(target: &str, link_type: LinkType, is_external: bool) -> Link {
    Link {
        target_url: Url::parse(target).unwrap(),
        link_type,
        is_external,
    }
}

fn crawl_config(fetcher: Arc<ScriptedFetcher>, links: LinksConfig) -> CrawlConfig {
    let mut config = CrawlConfig::new(fetcher);
    config.throttle = 4;
    config.links = links;
    config
}

fn seeds(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

const X: &str = "https://site.test/x";
const Y: &str = "https://site.test/y";

#[tokio::test]
async fn test_seed_only_crawl_with_failure() {
    let fetcher = Arc::new(
        ScriptedFetcher::default()
            .respond(X, 200, 50)
            .respond(Y, 404, 7),
    );
    let source = InterruptSource::detached();

    let report = async_crawl(
        seeds(&[X, Y]),
        crawl_config(fetcher.clone(), LinksConfig::none()),
        &source.signal(),
    )
    .await;

    let stats = &report.stats;
    assert_eq!(stats.total, 2);
    assert_eq!(stats.status_codes, HashMap::from([(200, 1), (404, 1)]));
    assert_eq!(stats.average_200_time, Duration::from_millis(50));
    assert_eq!(stats.max_200_time, Duration::from_millis(50));
    assert_eq!(stats.non_200_urls.len(), 1);
    assert_eq!(stats.non_200_urls[0].url, Y);
    assert_eq!(stats.non_200_urls[0].status_code, 404);
    assert!(stats.non_200_urls[0].linking_urls.is_empty());
    assert!(!report.stopped);

    assert!(matches!(
        report.verdict(),
        Err(CrawlError::PartialFailure { failed: 1, total: 2 })
    ));

    // Link following is off: one phase, no link extraction
    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].parse_links);
}

#[tokio::test]
async fn test_empty_seed_is_nothing_crawled() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let source = InterruptSource::detached();

    let report = async_crawl(
        Vec::new(),
        crawl_config(fetcher, LinksConfig::none()),
        &source.signal(),
    )
    .await;

    assert_eq!(report.stats.total, 0);
    assert!(matches!(report.verdict(), Err(CrawlError::NothingCrawled)));
}

#[tokio::test]
async fn test_all_200_is_success() {
    let fetcher = Arc::new(
        ScriptedFetcher::default()
            .respond(X, 200, 10)
            .respond(Y, 200, 30),
    );
    let source = InterruptSource::detached();

    let report = async_crawl(
        seeds(&[X, Y]),
        crawl_config(fetcher, LinksConfig::none()),
        &source.signal(),
    )
    .await;

    assert!(report.verdict().is_ok());
    assert_eq!(report.stats.average_200_time, Duration::from_millis(20));
    assert_eq!(report.stats.max_200_time, Duration::from_millis(30));
}

#[tokio::test]
async fn test_two_phase_crawl() {
    let a = "https://site.test/a";
    let b = "https://site.test/b";
    let page = "https://site.test/page";
    let broken = "https://site.test/broken";
    let image = "https://cdn.test/logo.png";
    let external = "https://other.test/";

    let fetcher = Arc::new(
        ScriptedFetcher::default()
            .respond_with_links(
                a,
                200,
                10,
                vec![
                    link(b, LinkType::Hyperlink, false),
                    link(page, LinkType::Hyperlink, false),
                    link(broken, LinkType::Hyperlink, false),
                    link(image, LinkType::Image, true),
                    link(external, LinkType::Hyperlink, true),
                ],
            )
            .respond_with_links(b, 200, 30, vec![link(broken, LinkType::Hyperlink, false)])
            .respond(page, 200, 50)
            .respond(broken, 500, 5),
    );
    let source = InterruptSource::detached();

    let policy = LinksConfig {
        crawl_external_links: false,
        crawl_hyperlinks: true,
        crawl_images: true,
    };
    let report = async_crawl(seeds(&[a, b]), crawl_config(fetcher.clone(), policy), &source.signal()).await;

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].parse_links);
    assert!(!calls[1].parse_links);

    let mut second: Vec<_> = calls[1].urls.clone();
    second.sort();
    assert_eq!(second, vec![broken.to_string(), page.to_string()]);

    let stats = &report.stats;
    assert_eq!(stats.total, 4);
    assert_eq!(stats.status_codes, HashMap::from([(200, 3), (500, 1)]));
    assert_eq!(stats.average_200_time, Duration::from_millis(30));
    assert_eq!(stats.max_200_time, Duration::from_millis(50));

    assert_eq!(stats.non_200_urls.len(), 1);
    assert_eq!(stats.non_200_urls[0].url, broken);
    assert_eq!(
        stats.non_200_urls[0].linking_urls,
        vec![a.to_string(), b.to_string()]
    );

    assert!(matches!(
        report.verdict(),
        Err(CrawlError::PartialFailure { failed: 1, total: 4 })
    ));
}

#[tokio::test]
async fn test_external_links_followed_when_enabled() {
    let a = "https://site.test/a";
    let image = "https://cdn.test/c.png";

    let fetcher = Arc::new(
        ScriptedFetcher::default()
            .respond_with_links(a, 200, 10, vec![link(image, LinkType::Image, true)])
            .respond(image, 404, 3),
    );
    let source = InterruptSource::detached();

    let policy = LinksConfig {
        crawl_external_links: true,
        crawl_hyperlinks: false,
        crawl_images: true,
    };
    let report = async_crawl(seeds(&[a]), crawl_config(fetcher, policy), &source.signal()).await;

    assert_eq!(report.stats.total, 2);
    assert_eq!(report.stats.non_200_urls[0].url, image);
    assert_eq!(report.stats.non_200_urls[0].linking_urls, vec![a.to_string()]);
}

#[tokio::test]
async fn test_seed_failures_have_no_linking_urls() {
    let fetcher = Arc::new(
        ScriptedFetcher::default().respond_with_links(
            X,
            200,
            10,
            vec![link(Y, LinkType::Hyperlink, false)],
        ),
    );
    let source = InterruptSource::detached();

    let policy = LinksConfig {
        crawl_hyperlinks: true,
        ..LinksConfig::none()
    };
    // Y is a seed answering 404 and is also linked from X
    let report = async_crawl(seeds(&[X, Y]), crawl_config(fetcher.clone(), policy), &source.signal()).await;

    assert_eq!(report.stats.total, 2);
    assert!(report.stats.non_200_urls[0].linking_urls.is_empty());
    // Nothing new to crawl, so no second fetch pass
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test]
async fn test_invalid_throttle_defaults_to_one() {
    let fetcher = Arc::new(ScriptedFetcher::default().respond(X, 200, 1));
    let source = InterruptSource::detached();

    let mut config = crawl_config(fetcher.clone(), LinksConfig::none());
    config.throttle = -2;
    async_crawl(seeds(&[X]), config, &source.signal()).await;

    assert_eq!(fetcher.calls()[0].throttle, 1);
}

#[tokio::test]
async fn test_host_override_reaches_fetcher() {
    let fetcher = Arc::new(ScriptedFetcher::default().respond(X, 200, 1));
    let source = InterruptSource::detached();

    let mut config = crawl_config(fetcher.clone(), LinksConfig::none());
    config.host = Some("staging.site.test".to_string());
    async_crawl(seeds(&[X]), config, &source.signal()).await;

    assert_eq!(
        fetcher.calls()[0].host.as_deref(),
        Some("staging.site.test")
    );
}

#[tokio::test]
async fn test_stopped_crawl_skips_link_phase() {
    let fetcher = Arc::new(ScriptedFetcher::default().respond_with_links(
        X,
        200,
        1,
        vec![link(Y, LinkType::Hyperlink, false)],
    ));
    let source = InterruptSource::detached();
    source.fire();

    let policy = LinksConfig {
        crawl_hyperlinks: true,
        ..LinksConfig::none()
    };
    let report = async_crawl(seeds(&[X]), crawl_config(fetcher.clone(), policy), &source.signal()).await;

    assert!(report.stopped);
    assert_eq!(report.stats.total, 0);
    assert_eq!(fetcher.calls().len(), 1);
    // Stopping is reported separately from the status verdict
    assert!(matches!(report.verdict(), Err(CrawlError::NothingCrawled)));
}
