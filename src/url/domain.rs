use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_crawl::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `target` lives on a different host than `page`
///
/// Ports and schemes are ignored. A target without a host is external.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_crawl::url::is_external;
///
/// let page = Url::parse("https://example.com/blog").unwrap();
/// assert!(!is_external(&page, &Url::parse("http://Example.com/about").unwrap()));
/// assert!(is_external(&page, &Url::parse("https://cdn.example.com/a.png").unwrap()));
/// ```
pub fn is_external(page: &Url, target: &Url) -> bool {
    match (extract_domain(page), extract_domain(target)) {
        (Some(page_domain), Some(target_domain)) => page_domain != target_domain,
        _ => true,
    }
}
