//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use image_spider::config::{Config, CrawlerConfig, FetcherConfig};
use image_spider::crawler::{crawl, Coordinator};
use image_spider::url::parse_start_url;
use std::process::Command;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration without delays, writing into `output_dir`
fn create_test_config(output_dir: &TempDir, max_depth: u32, max_attempts: u32) -> Config {
    Config {
        fetcher: FetcherConfig {
            max_attempts,
            ..FetcherConfig::without_delays()
        },
        crawler: CrawlerConfig {
            max_depth,
            output_dir: output_dir.path().display().to_string(),
        },
        ..Config::default()
    }
}

fn html_page(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn image(bytes: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(bytes.to_vec())
        .insert_header("content-type", "image/jpeg")
}

fn start_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("Failed to parse base URL")
}

#[tokio::test]
async fn test_two_level_crawl_with_back_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(format!(
            r#"<img src="pic.jpg"><a href="{}/next">Next</a>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page(format!(
            r#"<img src="/pic.jpg"><a href="{}/">Back home</a>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pic.jpg"))
        .respond_with(image(b"JPEG"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(&output_dir, 2, 3);

    let mut coordinator = Coordinator::new(&config, output_dir.path()).unwrap();
    let stats = coordinator.run(&start_url(&mock_server), 2).await.clone();

    assert_eq!(stats.pages_visited, 2);
    assert_eq!(stats.images_found, 2);
    assert_eq!(stats.images_saved, 1);
    assert_eq!(stats.images_skipped, 1);

    let visited = coordinator.visited();
    assert!(visited.contains(&start_url(&mock_server)));
    assert!(visited.contains(&Url::parse(&format!("{}/next", base_url)).unwrap()));

    let pic = Url::parse(&format!("{}/pic.jpg", base_url)).unwrap();
    assert!(coordinator.store().downloaded().contains(&pic));
    assert_eq!(
        std::fs::read(output_dir.path().join("pic.jpg")).unwrap(),
        b"JPEG"
    );
}

#[tokio::test]
async fn test_depth_one_does_not_follow_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<img src="/a.png"><a href="/child">Child</a>"#.to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(image(b"PNG"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(html_page(String::new()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(&output_dir, 1, 3);

    let stats = crawl(&config, &start_url(&mock_server)).await.unwrap();

    assert_eq!(stats.pages_visited, 1);
    assert_eq!(stats.images_saved, 1);
    assert!(output_dir.path().join("a.png").exists());
}

#[tokio::test]
async fn test_depth_limits_link_hops() {
    let mock_server = MockServer::start().await;

    // Chain: / -> /1 -> /2 -> /3
    for (page, next) in [("/", "/1"), ("/1", "/2"), ("/2", "/3")] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(format!(r#"<a href="{}">next</a>"#, next)))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/3"))
        .respond_with(html_page(String::new()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(&output_dir, 3, 1);

    let stats = crawl(&config, &start_url(&mock_server)).await.unwrap();
    assert_eq!(stats.pages_visited, 3);
}

#[tokio::test]
async fn test_cycle_pages_visited_once() {
    let mock_server = MockServer::start().await;

    // Every page links to every other page
    let links = r#"<a href="/">home</a><a href="/a">a</a><a href="/b">b</a>"#;
    for page in ["/", "/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(links.to_string()))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(&output_dir, 10, 1);

    let stats = crawl(&config, &start_url(&mock_server)).await.unwrap();
    assert_eq!(stats.pages_visited, 3);
    assert_eq!(stats.pages_failed, 0);
}

#[tokio::test]
async fn test_start_url_fragment_not_revisited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/child">child</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(html_page(r#"<a href="/">home</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(&output_dir, 3, 1);
    let start = parse_start_url(&format!("{}/#top", mock_server.uri())).unwrap();

    let stats = crawl(&config, &start).await.unwrap();
    assert_eq!(stats.pages_visited, 2);
}

#[tokio::test]
async fn test_start_page_failure_after_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(&output_dir, 3, 3);

    let stats = crawl(&config, &start_url(&mock_server))
        .await
        .expect("A failed page is not a crawl error");

    assert_eq!(stats.pages_visited, 1);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.images_saved, 0);
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failed_branch_does_not_stop_siblings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/broken">broken</a><a href="/ok">ok</a>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    // Marked visited before fetching, so the link from /ok makes no new attempts
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page(
            r#"<img src="/ok.gif"><img src="/missing.gif"><a href="/broken">again</a>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok.gif"))
        .respond_with(image(b"GIF89a"))
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(&output_dir, 3, 2);

    let stats = crawl(&config, &start_url(&mock_server)).await.unwrap();

    assert_eq!(stats.pages_visited, 3);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.images_saved, 1);
    assert_eq!(stats.images_failed, 1);
    assert!(output_dir.path().join("ok.gif").exists());
    assert!(!output_dir.path().join("missing.gif").exists());
}

#[tokio::test]
async fn test_non_image_references_never_requested() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<img src="/logo.svg"><img src="/photo.webp"><img src="/tracker.php?x=a.png">"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    for asset in ["/logo.svg", "/photo.webp", "/tracker.php"] {
        Mock::given(method("GET"))
            .and(path(asset))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(&output_dir, 1, 1);

    let stats = crawl(&config, &start_url(&mock_server)).await.unwrap();
    assert_eq!(stats.images_found, 0);
    assert_eq!(stats.images_saved, 0);
}

#[test]
fn test_level_without_recursion_exits_non_zero() {
    let output_dir = TempDir::new().unwrap();
    let target = output_dir.path().join("never-created");

    // Port 9 is never served; the process must fail before any request anyway
    let output = Command::new(env!("CARGO_BIN_EXE_spider"))
        .args(["-l", "3", "-p"])
        .arg(&target)
        .arg("http://127.0.0.1:9/")
        .output()
        .expect("Failed to run spider binary");

    assert!(!output.status.success());
    assert!(!target.exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("requires the -r option").count(),
        1,
        "error should be reported exactly once: {}",
        stderr
    );
}

#[test]
fn test_dry_run_exits_zero() {
    let output_dir = TempDir::new().unwrap();
    let target = output_dir.path().join("images");

    let output = Command::new(env!("CARGO_BIN_EXE_spider"))
        .args(["-r", "-l", "2", "--dry-run", "-p"])
        .arg(&target)
        .arg("http://127.0.0.1:9/")
        .output()
        .expect("Failed to run spider binary");

    assert!(output.status.success());
    assert!(target.is_dir());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Max depth: 2"));
}
