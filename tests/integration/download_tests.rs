//! Integration tests for the download pipeline
//!
//! These tests use wiremock to create mock HTTP servers and tempfile output
//! directories to exercise full runs end-to-end.

use scrawl::config::{RunConfig, DEFAULT_USER_AGENT};
use scrawl::download::{build_http_client, run, Dispatcher, Fetcher, JobFailure};
use scrawl::state::JobState;
use scrawl::ScrawlError;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at `page_path` on the mock server
fn create_test_config(
    server: &MockServer,
    page_path: &str,
    selector: &str,
    dir: &TempDir,
) -> RunConfig {
    let base = Url::parse(&format!("{}{}", server.uri(), page_path)).expect("valid base URL");
    let mut config = RunConfig::new(base, selector);
    config.dir = dir.path().to_path_buf();
    config
}

/// Mounts an HTML page at `page_path`
async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a binary asset at `asset_path`
async fn mount_asset(server: &MockServer, asset_path: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(asset_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

/// Number of requests the server received for `request_path`
async fn requests_for(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}

#[tokio::test]
async fn test_three_image_scenario() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &site,
        "/p",
        format!(
            r#"<html><body>
            <img src="/a.png">
            <img src="{}/b.png">
            <img src="">
            </body></html>"#,
            other.uri()
        ),
    )
    .await;
    mount_asset(&site, "/a.png", b"alpha").await;
    mount_asset(&other, "/b.png", b"bravo").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&site, "/p", "img", &dir);
    config.attr = Some("src".to_string());

    let outcome = run(config).await.expect("run should succeed");

    assert_eq!(outcome.total(), 3);
    assert!(outcome.is_complete());
    assert_eq!(outcome.done(), 2);
    assert_eq!(outcome.failed(), 1);

    let first = &outcome.jobs[0];
    assert_eq!(first.id, 1);
    assert_eq!(
        first.target.as_ref().map(Url::to_string),
        Some(format!("{}/a.png", site.uri()))
    );
    assert_eq!(first.state, JobState::Done);

    let second = &outcome.jobs[1];
    assert_eq!(
        second.target.as_ref().map(Url::to_string),
        Some(format!("{}/b.png", other.uri()))
    );
    assert_eq!(second.state, JobState::Done);

    let third = &outcome.jobs[2];
    assert_eq!(third.reference, "");
    assert_eq!(
        third.target.as_ref().map(Url::to_string),
        Some(format!("{}/p", site.uri()))
    );
    assert!(matches!(third.failure(), Some(JobFailure::DegenerateTarget)));

    assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"alpha");
    assert_eq!(std::fs::read(dir.path().join("b.png")).unwrap(), b"bravo");
    assert!(!dir.path().join("p").exists());

    // The base page is fetched once, for extraction only
    assert_eq!(requests_for(&site, "/p").await, 1);
}

#[tokio::test]
async fn test_zero_matches_spawns_no_jobs() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/empty",
        r#"<html><body><p>No images here</p></body></html>"#.to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, "/empty", "img", &dir);
    config.attr = Some("src".to_string());

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, ScrawlError::NoReferences { .. }));
    assert_eq!(err.exit_code(), 2);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_not_found_asset_isolated() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/gallery",
        r#"<a href="/one.txt">1</a><a href="/missing.txt">2</a><a href="/three.txt">3</a>"#
            .to_string(),
    )
    .await;
    mount_asset(&server, "/one.txt", b"one").await;
    mount_asset(&server, "/three.txt", b"three").await;
    Mock::given(method("GET"))
        .and(path("/missing.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, "/gallery", "a", &dir);
    config.attr = Some("href".to_string());

    let outcome = run(config).await.expect("job failures must not fail the run");

    assert_eq!(outcome.done(), 2);
    assert_eq!(outcome.failed(), 1);
    match outcome.jobs[1].failure() {
        Some(JobFailure::Fetch(err)) => assert_eq!(err.status(), Some(404)),
        other => panic!("expected a fetch failure, got {:?}", other),
    }
    assert_eq!(std::fs::read(dir.path().join("one.txt")).unwrap(), b"one");
    assert_eq!(std::fs::read(dir.path().join("three.txt")).unwrap(), b"three");
    assert!(!dir.path().join("missing.txt").exists());
}

#[tokio::test]
async fn test_second_run_skips_existing_files() {
    let page = r#"<script src="/app.js"></script><script src="/vendor.js"></script>"#;

    let first_server = MockServer::start().await;
    mount_page(&first_server, "/", page.to_string()).await;
    mount_asset(&first_server, "/app.js", b"first app").await;
    mount_asset(&first_server, "/vendor.js", b"first vendor").await;

    // Same page and file names, different content
    let second_server = MockServer::start().await;
    mount_page(&second_server, "/", page.to_string()).await;
    mount_asset(&second_server, "/app.js", b"second app").await;
    mount_asset(&second_server, "/vendor.js", b"second vendor").await;

    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(&first_server, "/", "script", &dir);
    config.attr = Some("src".to_string());
    let first = run(config).await.unwrap();
    assert_eq!(first.done(), 2);

    let mut config = create_test_config(&second_server, "/", "script", &dir);
    config.attr = Some("src".to_string());
    let second = run(config).await.unwrap();
    assert_eq!(second.skipped(), 2);
    assert_eq!(second.done(), 0);
    assert!(second.jobs.iter().all(|job| job.state == JobState::Skipped));

    assert_eq!(std::fs::read(dir.path().join("app.js")).unwrap(), b"first app");
    assert_eq!(
        std::fs::read(dir.path().join("vendor.js")).unwrap(),
        b"first vendor"
    );

    // Skipped jobs never hit the network
    assert_eq!(requests_for(&second_server, "/app.js").await, 0);
    assert_eq!(requests_for(&second_server, "/vendor.js").await, 0);
}

#[tokio::test]
async fn test_overwrite_replaces_existing_files() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<img src="logo.svg">"#.to_string()).await;
    mount_asset(&server, "/logo.svg", b"<svg>new</svg>").await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("logo.svg"), b"<svg>old and longer</svg>").unwrap();

    let mut config = create_test_config(&server, "/", "img", &dir);
    config.attr = Some("src".to_string());
    config.overwrite = true;

    let outcome = run(config).await.unwrap();
    assert_eq!(outcome.done(), 1);
    assert_eq!(
        std::fs::read(dir.path().join("logo.svg")).unwrap(),
        b"<svg>new</svg>"
    );
}

#[tokio::test]
async fn test_text_content_references() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    mount_page(
        &server,
        "/list",
        format!(
            r#"<ul class="files">
                <li> docs/readme.txt </li>
                <li>{}/data.csv</li>
            </ul>"#,
            other.uri()
        ),
    )
    .await;
    mount_asset(&server, "/docs/readme.txt", b"read me").await;
    mount_asset(&other, "/data.csv", b"a,b\n1,2\n").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, "/list", "ul.files li", &dir);

    let outcome = run(config).await.unwrap();
    assert_eq!(outcome.done(), 2);
    assert_eq!(
        std::fs::read(dir.path().join("readme.txt")).unwrap(),
        b"read me"
    );
    assert_eq!(
        std::fs::read(dir.path().join("data.csv")).unwrap(),
        b"a,b\n1,2\n"
    );
}

#[tokio::test]
async fn test_missing_attribute_becomes_failed_job() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/p",
        r#"<img src="/a.png"><img alt="no source">"#.to_string(),
    )
    .await;
    mount_asset(&server, "/a.png", b"a").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, "/p", "img", &dir);
    config.attr = Some("src".to_string());

    let outcome = run(config).await.unwrap();
    assert_eq!(outcome.total(), 2);
    assert_eq!(outcome.done(), 1);
    assert!(matches!(
        outcome.jobs[1].failure(),
        Some(JobFailure::DegenerateTarget)
    ));
}

#[tokio::test]
async fn test_round_trip_bytes() {
    let server = MockServer::start().await;
    let payload: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    mount_page(
        &server,
        "/",
        r#"<a class="dl" href="/blob.bin">blob</a>"#.to_string(),
    )
    .await;
    mount_asset(&server, "/blob.bin", &payload).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, "/", "a.dl", &dir);
    config.attr = Some("href".to_string());

    let outcome = run(config).await.unwrap();
    assert_eq!(outcome.bytes_written(), payload.len());
    assert_eq!(std::fs::read(dir.path().join("blob.bin")).unwrap(), payload);
}

#[tokio::test]
async fn test_base_page_not_found_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, "/nowhere", "img", &dir);

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, ScrawlError::PageFetch { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_latin1_page_references_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"<p>caf\xe9</p><img src=\"/a.png\">".to_vec())
                .insert_header("content-type", "text/html; charset=iso-8859-1"),
        )
        .mount(&server)
        .await;
    mount_asset(&server, "/a.png", b"alpha").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, "/p", "img", &dir);
    config.attr = Some("src".to_string());

    let outcome = run(config).await.expect("legacy encodings must not fail setup");
    assert_eq!(outcome.total(), 1);
    assert_eq!(outcome.done(), 1);
    assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"alpha");
}

#[tokio::test]
async fn test_binary_base_page_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00])
                .insert_header("content-type", "image/png"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, "/logo.png", "img", &dir);

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, ScrawlError::PageParse { .. }));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_invalid_selector_fails_before_fetching() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, "/p", "img[", &dir);

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, ScrawlError::Config(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_concurrency_bound_respected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow asset")
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let base = Url::parse(&format!("{}/p", server.uri())).unwrap();
    let fetcher = Fetcher::new(build_http_client(DEFAULT_USER_AGENT, None).unwrap());
    let dispatcher = Dispatcher::new(base, dir.path().to_path_buf(), false, fetcher, 2);

    let references: Vec<String> = (1..=8).map(|i| format!("/asset-{}.txt", i)).collect();
    let outcome = dispatcher.dispatch(references).await;

    assert_eq!(outcome.done(), 8);
    assert_eq!(dispatcher.gate().peak(), 2);
    assert_eq!(dispatcher.gate().in_flight(), 0);
}

#[tokio::test]
async fn test_jobs_numbered_in_extraction_order() {
    let server = MockServer::start().await;
    let links: String = (1..=6)
        .map(|i| format!(r#"<a href="/f{}.txt">f{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", links).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, "/", "a", &dir);
    config.attr = Some("href".to_string());
    config.concurrency = 3;

    let outcome = run(config).await.unwrap();
    let refs: Vec<&str> = outcome.jobs.iter().map(|job| job.reference.as_str()).collect();
    assert_eq!(
        refs,
        vec!["/f1.txt", "/f2.txt", "/f3.txt", "/f4.txt", "/f5.txt", "/f6.txt"]
    );
    let ids: Vec<usize> = outcome.jobs.iter().map(|job| job.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}
