//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_ripple::config::Config;
use link_ripple::crawler::run_crawl;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawl configuration seeded at the mock server's root
fn create_test_config(base_url: &str, recursive: bool, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = format!("{}/", base_url);
    config.crawler.recursive = recursive;
    config.crawler.max_depth = max_depth;
    config.crawler.page_timeout_secs = 5;
    config
}

fn html_page(body: String) -> ResponseTemplate {
    // The MIME type given to set_body_raw wins over an inserted content-type header
    ResponseTemplate::new(200).set_body_raw(format!("<html><body>{}</body></html>", body), "text/html")
}

/// Reads the link CSV back as (URL, Parent URL) pairs
fn read_links(path: &Path) -> Vec<(String, String)> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open link CSV");
    let headers = reader.headers().expect("Missing header").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["URL", "Parent URL"]);

    reader
        .records()
        .map(|r| {
            let r = r.expect("Bad CSV row");
            (r[0].to_string(), r[1].to_string())
        })
        .collect()
}

#[tokio::test]
async fn test_seed_with_backlink_emits_each_link_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Seed links to /a; /a links back to the seed and to /b
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(format!(r#"<a href="{}/a">A</a>"#, base_url)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(r#"<a href="/">Home</a><a href="/b">B</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(r#"<a href="/a">A again</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let links_path = dir.path().join("get-links.csv");
    let config = create_test_config(&base_url, true, 5);

    let stats = run_crawl(&config, &links_path).await.expect("Crawl failed");

    let links = read_links(&links_path);
    assert_eq!(
        links,
        vec![
            (format!("{}/a", base_url), format!("{}/", base_url)),
            (format!("{}/b", base_url), format!("{}/a", base_url)),
        ]
    );
    assert_eq!(stats.links_emitted, 2);
    assert_eq!(stats.pages_fetched, 3);
    assert!(stats.duplicates >= 2);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/broken">Broken</a><a href="/slow">Slow</a><a href="/ok">OK</a>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page(String::new()).set_delay(std::time::Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page(r#"<a href="/deeper">Deeper</a>"#.to_string()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/deeper"))
        .respond_with(html_page(String::new()))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let links_path = dir.path().join("out/get-links.csv");
    let mut config = create_test_config(&base_url, true, 2);
    config.crawler.page_timeout_secs = 1;

    let stats = run_crawl(&config, &links_path).await.expect("Crawl failed");

    let urls: Vec<String> = read_links(&links_path).into_iter().map(|(u, _)| u).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/broken", base_url),
            format!("{}/slow", base_url),
            format!("{}/ok", base_url),
            format!("{}/deeper", base_url),
        ]
    );
    assert_eq!(stats.pages_failed, 2);
}

#[tokio::test]
async fn test_depth_limit_emits_but_does_not_fetch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/level1">L1</a>"#.to_string()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_page(r#"<a href="/level2">L2</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_page(r#"<a href="/level3">L3</a>"#.to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let links_path = dir.path().join("get-links.csv");
    let config = create_test_config(&base_url, true, 1);

    let stats = run_crawl(&config, &links_path).await.expect("Crawl failed");

    let urls: Vec<String> = read_links(&links_path).into_iter().map(|(u, _)| u).collect();
    assert_eq!(
        urls,
        vec![format!("{}/level1", base_url), format!("{}/level2", base_url)]
    );
    assert_eq!(stats.deepest_level, Some(1));
}

#[tokio::test]
async fn test_other_domains_are_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="https://elsewhere.example/x">Out</a>
               <a href="/in">In</a>
               <a href="/ld.php?content_id=99">Download</a>
               <a href="mailto:help@example.com">Mail</a>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let links_path = dir.path().join("get-links.csv");
    let config = create_test_config(&base_url, false, 5);

    let stats = run_crawl(&config, &links_path).await.expect("Crawl failed");

    let urls: Vec<String> = read_links(&links_path).into_iter().map(|(u, _)| u).collect();
    assert_eq!(urls, vec![format!("{}/in", base_url)]);
    assert_eq!(stats.out_of_domain, 1);
}

#[tokio::test]
async fn test_max_links_caps_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let many: String = (0..50).map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i)).collect();
    Mock::given(method("GET"))
        .respond_with(html_page(many))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let links_path = dir.path().join("get-links.csv");
    let mut config = create_test_config(&base_url, true, 3);
    config.crawler.max_links = 10;

    run_crawl(&config, &links_path).await.expect("Crawl failed");

    assert_eq!(read_links(&links_path).len(), 10);
}

#[tokio::test]
async fn test_unreachable_seed_still_writes_header() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let dir = TempDir::new().unwrap();
    let links_path = dir.path().join("get-links.csv");
    let config = create_test_config(&format!("http://127.0.0.1:{}", port), true, 2);

    let stats = run_crawl(&config, &links_path).await.expect("Crawl failed");

    assert!(read_links(&links_path).is_empty());
    assert_eq!(stats.pages_failed, 1);
}
