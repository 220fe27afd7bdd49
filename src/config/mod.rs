//! Configuration module for Sitemap-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use throttle: {}", config.crawler.throttle);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, LinksConfig, SitemapConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_sitemap_url};
