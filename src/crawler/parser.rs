//! HTML parser for extracting links
//!
//! This module handles parsing fetched pages to find the references that may
//! be followed in the second crawl phase:
//! - Hyperlinks (`<a href="...">`)
//! - Images (`<img src="...">`)

use crate::crawler::fetcher::{Link, LinkType};
use crate::url::is_external;
use scraper::{Html, Selector};
use url::Url;

/// Parses HTML content and extracts typed links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` as [`LinkType::Hyperlink`]
/// - `<img src="...">` as [`LinkType::Image`]
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that does not resolve to an HTTP(S) URL
///
/// Fragments are stripped from resolved URLs. Each link is flagged external
/// when its host differs from `page_url`'s host.
///
/// # Example
///
/// ```
/// use sitemap_crawl::crawler::{extract_links, LinkType};
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><img src="https://cdn.example.org/logo.png">"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &page);
///
/// assert_eq!(links[0].target_url.as_str(), "https://example.com/about");
/// assert_eq!(links[0].link_type, LinkType::Hyperlink);
/// assert!(!links[0].is_external);
/// assert_eq!(links[1].link_type, LinkType::Image);
/// assert!(links[1].is_external);
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Link> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    collect(&document, "a[href]", "href", LinkType::Hyperlink, page_url, &mut links);
    collect(&document, "img[src]", "src", LinkType::Image, page_url, &mut links);

    links
}

fn collect(
    document: &Html,
    selector: &str,
    attribute: &str,
    link_type: LinkType,
    page_url: &Url,
    links: &mut Vec<Link>,
) {
    let Ok(selector) = Selector::parse(selector) else {
        return;
    };

    for element in document.select(&selector) {
        if let Some(target_url) = element
            .value()
            .attr(attribute)
            .and_then(|value| resolve_link(value, page_url))
        {
            links.push(Link {
                is_external: is_external(page_url, &target_url),
                target_url,
                link_type,
            });
        }
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url)
}
