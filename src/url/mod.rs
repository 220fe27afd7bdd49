//! URL handling module for Sitemap-Crawl
//!
//! This module provides host comparison and host override helpers used by the
//! fetcher when classifying links and sending requests.

mod domain;
mod host;

// Re-export main functions
pub use domain::{extract_domain, is_external};
pub use host::override_host;
