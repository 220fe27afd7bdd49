//! Crawler module for sitemap crawling
//!
//! This module contains the core crawling logic, including:
//! - The streaming fetcher interface and its HTTP implementation
//! - HTML link extraction
//! - Single-phase fetch passes
//! - Second-hop link selection
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod links;
mod parser;
mod phase;

pub use coordinator::{async_crawl, crawl_sitemap, CrawlConfig, CrawlReport};
pub use fetcher::{
    build_http_client, fetch_url, FetchOutcome, FetchStream, Fetcher, Link, LinkType,
    ReqwestFetcher,
};
pub use links::{expand_links, should_follow, LinkExpansion};
pub use parser::extract_links;
pub use phase::{run_phase, PhaseOutcome};
