//! Second-hop link selection
//!
//! Decides which links found during the first phase get fetched in the second
//! one, and remembers which first-phase pages referenced each of them.

use crate::config::LinksConfig;
use crate::crawler::fetcher::{FetchOutcome, Link, LinkType};
use crate::stats::CrawlStats;
use std::collections::HashMap;

/// Links selected for the second phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkExpansion {
    /// Target URL mapped to the first-phase URLs that linked to it, in
    /// discovery order
    pub linking_urls: HashMap<String, Vec<String>>,
}

impl LinkExpansion {
    /// URLs to crawl in the second phase, in no particular order
    pub fn urls(&self) -> Vec<String> {
        self.linking_urls.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.linking_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linking_urls.is_empty()
    }

    /// Pages that linked to `url`
    pub fn linking_urls_for(&self, url: &str) -> &[String] {
        self.linking_urls
            .get(url)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Attaches the linking URLs to every non-200 result of `stats`
    pub fn annotate(&self, stats: &mut CrawlStats) {
        for result in &mut stats.non_200_urls {
            result.linking_urls = self.linking_urls_for(&result.url).to_vec();
        }
    }
}

/// Returns true if `policy` allows following `link`
pub fn should_follow(link: &Link, policy: &LinksConfig) -> bool {
    if link.is_external && !policy.crawl_external_links {
        return false;
    }

    match link.link_type {
        LinkType::Hyperlink => policy.crawl_hyperlinks,
        LinkType::Image => policy.crawl_images,
    }
}

/// Computes the second-phase URL set
///
/// Every link of every first-phase result that passes [`should_follow`] is
/// recorded against the result's URL. URLs that were part of the first-phase
/// input are then dropped so nothing is fetched twice.
pub fn expand_links(
    results: &[FetchOutcome],
    crawled_urls: &[String],
    policy: &LinksConfig,
) -> LinkExpansion {
    let mut linking_urls: HashMap<String, Vec<String>> = HashMap::new();

    for result in results {
        for link in result.links.iter().filter(|l| should_follow(l, policy)) {
            linking_urls
                .entry(link.target_url.to_string())
                .or_default()
                .push(result.url.clone());
        }
    }

    for url in crawled_urls {
        linking_urls.remove(url);
    }

    LinkExpansion { linking_urls }
}
