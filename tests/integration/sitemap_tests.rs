//! Sitemap retrieval against a wiremock server

use reqwest::Client;
use sitemap_crawl::sitemap::{extract_seed_urls, get_sitemap_urls};
use sitemap_crawl::SitemapError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

fn urlset(locations: &[String]) -> String {
    let entries: String = locations
        .iter()
        .map(|loc| format!("  <url><loc>{}</loc></url>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        entries
    )
}

fn sitemap_index(locations: &[String]) -> String {
    let entries: String = locations
        .iter()
        .map(|loc| format!("  <sitemap><loc>{}</loc></sitemap>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</sitemapindex>",
        entries
    )
}

#[tokio::test]
async fn test_urlset() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/", base_url),
            format!("{}/blog", base_url),
        ])))
        .mount(&mock_server)
        .await;

    let urls = extract_seed_urls(&Client::new(), &format!("{}/sitemap.xml", base_url))
        .await
        .unwrap();

    assert_eq!(urls, vec![format!("{}/", base_url), format!("{}/blog", base_url)]);
}

#[tokio::test]
async fn test_index_followed_one_level() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(xml(sitemap_index(&[
            format!("{}/sitemap-pages.xml", base_url),
            format!("{}/sitemap-missing.xml", base_url),
            format!("{}/sitemap-nested.xml", base_url),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-pages.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/a", base_url),
            format!("{}/b", base_url),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-nested.xml"))
        .respond_with(xml(sitemap_index(&[format!("{}/sitemap-deep.xml", base_url)])))
        .mount(&mock_server)
        .await;
    // Two levels down is never requested
    Mock::given(method("GET"))
        .and(path("/sitemap-deep.xml"))
        .respond_with(xml(urlset(&[format!("{}/deep", base_url)])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let urls = extract_seed_urls(&Client::new(), &format!("{}/sitemap_index.xml", base_url))
        .await
        .unwrap();

    assert_eq!(urls, vec![format!("{}/a", base_url), format!("{}/b", base_url)]);
}

#[tokio::test]
async fn test_invalid_entries_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/ok", base_url),
            "relative/path".to_string(),
        ])))
        .mount(&mock_server)
        .await;

    let urls = get_sitemap_urls(&Client::new(), &format!("{}/sitemap.xml", base_url))
        .await
        .unwrap();

    assert_eq!(urls.len(), 1);
    assert_eq!(urls[0].path(), "/ok");
}

#[tokio::test]
async fn test_empty_sitemap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(urlset(&[])))
        .mount(&mock_server)
        .await;

    let urls = extract_seed_urls(&Client::new(), &format!("{}/sitemap.xml", mock_server.uri()))
        .await
        .unwrap();

    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_missing_sitemap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = extract_seed_urls(&Client::new(), &format!("{}/sitemap.xml", mock_server.uri())).await;

    match result {
        Err(SitemapError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected a status error, got {:?}", other),
    }
}
