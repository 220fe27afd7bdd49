//! Sitemap handling module
//!
//! This module retrieves the seed URLs of a crawl from an XML sitemap. A
//! sitemap index is followed one level deep: the URLs of every sitemap it
//! lists are returned, but indexes nested further are not.

mod parser;

pub use parser::{parse_sitemap, ParsedSitemap};

use crate::SitemapError;
use reqwest::Client;
use url::Url;

/// Returns all URLs found in the sitemap, as strings
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `sitemap_url` - URL of the sitemap or sitemap index
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The URLs, in sitemap order
/// * `Err(SitemapError)` - The sitemap itself could not be retrieved
pub async fn extract_seed_urls(
    client: &Client,
    sitemap_url: &str,
) -> Result<Vec<String>, SitemapError> {
    let urls = get_sitemap_urls(client, sitemap_url).await?;
    Ok(urls.into_iter().map(String::from).collect())
}

/// Returns all URLs found in the sitemap
///
/// Entries that are not valid URLs are logged and skipped. A listed sitemap
/// that cannot be retrieved is logged and skipped; only a failure on the
/// sitemap at `sitemap_url` is an error.
pub async fn get_sitemap_urls(client: &Client, sitemap_url: &str) -> Result<Vec<Url>, SitemapError> {
    Url::parse(sitemap_url)
        .map_err(|e| SitemapError::InvalidUrl(format!("{}: {}", sitemap_url, e)))?;

    let body = fetch_sitemap(client, sitemap_url).await.map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    let parsed = parse_sitemap(&body);

    let mut urls = parse_locations(&parsed.urls);

    for child_url in &parsed.sitemaps {
        tracing::debug!("Following sitemap {}", child_url);

        let child_body = match fetch_sitemap(client, child_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("{}", e);
                continue;
            }
        };

        let child = parse_sitemap(&child_body);
        if !child.sitemaps.is_empty() {
            tracing::debug!(
                "Ignoring {} sitemaps nested in {}",
                child.sitemaps.len(),
                child_url
            );
        }
        urls.extend(parse_locations(&child.urls));
    }

    Ok(urls)
}

fn parse_locations(locations: &[String]) -> Vec<Url> {
    locations
        .iter()
        .filter_map(|loc| match Url::parse(loc) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!("Skipping invalid sitemap entry {}: {}", loc, e);
                None
            }
        })
        .collect()
}

/// Downloads a sitemap document
async fn fetch_sitemap(client: &Client, sitemap_url: &str) -> Result<String, SitemapError> {
    let response = client
        .get(sitemap_url)
        .send()
        .await
        .map_err(|source| SitemapError::Http {
            url: sitemap_url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SitemapError::Status {
            url: sitemap_url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| SitemapError::Body {
        url: sitemap_url.to_string(),
        source,
    })
}
