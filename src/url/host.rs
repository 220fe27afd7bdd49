use url::{ParseError, Url};

/// Returns `url` with its host replaced by `host`
///
/// `host` may carry a port (`"localhost:8080"`), in which case the port is
/// replaced too. Scheme, path and query are kept.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_crawl::url::override_host;
///
/// let url = Url::parse("https://example.com/a?b=c").unwrap();
/// let moved = override_host(&url, "staging.example.com").unwrap();
/// assert_eq!(moved.as_str(), "https://staging.example.com/a?b=c");
/// ```
pub fn override_host(url: &Url, host: &str) -> Result<Url, ParseError> {
    let mut moved = url.clone();

    let (name, port) = match host.rsplit_once(':') {
        Some((name, port)) if !name.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => {
            (name, port.parse::<u16>().ok())
        }
        _ => (host, None),
    };

    moved.set_host(Some(name))?;
    if port.is_some() {
        moved
            .set_port(port)
            .map_err(|_| ParseError::InvalidPort)?;
    }

    Ok(moved)
}
