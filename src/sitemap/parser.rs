//! Sitemap XML parsing
//!
//! `<loc>` values are read with an XML pull parser, so CDATA sections,
//! entities and namespace prefixes are all handled. Whether a location is a
//! page or a child sitemap is decided by its parent element.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Locations listed in one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSitemap {
    /// `<url><loc>` entries of a `<urlset>`
    pub urls: Vec<String>,

    /// `<sitemap><loc>` entries of a `<sitemapindex>`
    pub sitemaps: Vec<String>,
}

/// Parses a sitemap or sitemap index
///
/// Location values are trimmed and empty ones dropped; they are not validated.
/// Parsing stops at the first XML error, keeping the locations read so far.
///
/// # Example
///
/// ```
/// use sitemap_crawl::sitemap::parse_sitemap;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/</loc></url>
///   <url><loc><![CDATA[https://example.com/about]]></loc></url>
/// </urlset>"#;
///
/// let parsed = parse_sitemap(xml);
/// assert_eq!(parsed.urls, vec!["https://example.com/", "https://example.com/about"]);
/// assert!(parsed.sitemaps.is_empty());
/// ```
pub fn parse_sitemap(xml: &str) -> ParsedSitemap {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut parsed = ParsedSitemap::default();
    // Local names of the open elements
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut loc = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                open.push(e.local_name().as_ref().to_vec());
                if is_open(&open, b"loc") {
                    loc.clear();
                }
            }
            Ok(Event::Text(t)) if is_open(&open, b"loc") => match t.unescape() {
                Ok(text) => loc.push_str(&text),
                Err(e) => tracing::debug!("Skipping undecodable sitemap text: {}", e),
            },
            Ok(Event::CData(c)) if is_open(&open, b"loc") => {
                loc.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(_)) => {
                if is_open(&open, b"loc") {
                    let value = loc.trim();
                    if !value.is_empty() {
                        match open.iter().rev().nth(1).map(Vec::as_slice) {
                            Some(b"url") => parsed.urls.push(value.to_string()),
                            Some(b"sitemap") => parsed.sitemaps.push(value.to_string()),
                            _ => {}
                        }
                    }
                    loc.clear();
                }
                open.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    "Invalid sitemap XML at position {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
    }

    parsed
}

fn is_open(open: &[Vec<u8>], name: &[u8]) -> bool {
    open.last().map(Vec::as_slice) == Some(name)
}
