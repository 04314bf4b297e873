//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole crawl
//! sessions end-to-end against them.

use hostwalk::config::{Config, ErrorPolicy};
use hostwalk::output::render_page;
use hostwalk::{collect_pages, start_crawl, CrawlError, Page};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given depth and error policy
fn create_test_config(max_depth: u32, error_policy: ErrorPolicy) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.request_timeout_secs = 5;
    config.crawler.error_policy = error_policy;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn find<'a>(pages: &'a [Page], route: &str) -> &'a Page {
    pages
        .iter()
        .find(|page| page.url.path() == route)
        .unwrap_or_else(|| panic!("no page for {}", route))
}

#[tokio::test]
async fn test_depth_zero_emits_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<title>Home</title>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(0, ErrorPolicy::SkipBranch);
    let mut session = start_crawl(&config, &format!("{}/", server.uri())).unwrap();

    assert!(session.next_page().await.is_none());

    let summary = session.finish().await.unwrap();
    assert_eq!(summary.pages_emitted, 0);
    assert_eq!(summary.urls_claimed, 0);
}

#[tokio::test]
async fn test_depth_one_emits_only_seed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<title>Home</title><a href="/about">About</a><a href="/help">Help</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<title>About</title>"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/help"))
        .respond_with(html("<title>Help</title>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(1, ErrorPolicy::SkipBranch);
    let pages = collect_pages(&config, &server.uri()).await.unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].title, "Home");
    assert_eq!(pages[0].depth, 0);

    // links are listed even though they are not followed
    let links: Vec<&str> = pages[0].links.iter().map(|link| link.path()).collect();
    assert_eq!(links, vec!["/about", "/help"]);
}

#[tokio::test]
async fn test_mutual_links_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<title>A</title><a href="/b">B</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(r#"<title>B</title><a href="/a">A</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(3, ErrorPolicy::SkipBranch);
    let pages = collect_pages(&config, &format!("{}/a", server.uri()))
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(find(&pages, "/a").depth, 0);
    assert_eq!(find(&pages, "/b").depth, 1);
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        r#"
        <html>
        <head><title>Welcome</title></head>
        <body>
            <a href="/about">About</a>
            <a href="/help">Help</a>
            <a href="https://www.w3schools.com/html/default.asp">Learn HTML</a>
            <a href="/about#team">About again</a>
        </body>
        </html>
        "#,
    )
    .await;
    mount_page(
        &server,
        "/about",
        r#"<title>About us</title><a href="/">Home</a><a href="/about/team">Team</a>"#,
    )
    .await;
    mount_page(&server, "/help", r#"<title>Help</title><a href="/faq">FAQ</a>"#).await;
    mount_page(&server, "/about/team", "<title>Team</title>").await;
    mount_page(&server, "/faq", "<title>FAQ</title>").await;

    let config = create_test_config(3, ErrorPolicy::SkipBranch);
    let mut session = start_crawl(&config, &base_url).unwrap();

    let mut pages = Vec::new();
    while let Some(page) = session.next_page().await {
        pages.push(page);
    }
    let summary = session.finish().await.unwrap();

    // the seed is always emitted first
    assert_eq!(pages[0].title, "Welcome");
    assert_eq!(pages[0].depth, 0);

    let home = find(&pages, "/");
    let links: Vec<&str> = home.links.iter().map(|link| link.path()).collect();
    assert_eq!(links, vec!["/about", "/help"]);

    assert_eq!(pages.len(), 5);
    assert_eq!(find(&pages, "/about").depth, 1);
    assert_eq!(find(&pages, "/help").depth, 1);
    assert_eq!(find(&pages, "/about/team").depth, 2);
    assert_eq!(find(&pages, "/faq").depth, 2);

    // every emitted page is on the seed host
    let host = url::Url::parse(&base_url).unwrap();
    assert!(pages
        .iter()
        .all(|page| page.url.host_str() == host.host_str()));

    assert_eq!(summary.pages_emitted, 5);
    assert_eq!(summary.failed_branches, 0);
    assert_eq!(summary.urls_claimed, 5);
}

#[tokio::test]
async fn test_depth_bounds_recursion() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<title>L0</title><a href="/one">1</a>"#).await;
    mount_page(&server, "/one", r#"<title>L1</title><a href="/two">2</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(html(r#"<title>L2</title>"#))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(2, ErrorPolicy::SkipBranch);
    let pages = collect_pages(&config, &server.uri()).await.unwrap();

    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|page| page.depth < 2));
}

#[tokio::test]
async fn test_skip_branch_continues_past_failures() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"
        <title>Home</title>
        <a href="/report.pdf">Report</a>
        <a href="/ok">Ok</a>
        "#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<title>Ok</title>").await;

    let config = create_test_config(2, ErrorPolicy::SkipBranch);
    let mut session = start_crawl(&config, &server.uri()).unwrap();

    let mut pages = Vec::new();
    while let Some(page) = session.next_page().await {
        pages.push(page);
    }
    let summary = session.finish().await.unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(find(&pages, "/ok").title, "Ok");
    assert_eq!(summary.failed_branches, 1);
    // the failed URL stays claimed
    assert_eq!(summary.urls_claimed, 3);
}

#[tokio::test]
async fn test_skip_branch_survives_connection_failure() {
    let server = MockServer::start().await;
    // same host, different port: nothing listens there
    mount_page(
        &server,
        "/",
        r#"<title>Home</title><a href="http://127.0.0.1:1/dead">Dead</a>"#,
    )
    .await;

    let config = create_test_config(2, ErrorPolicy::SkipBranch);
    let mut session = start_crawl(&config, &server.uri()).unwrap();

    let mut pages = Vec::new();
    while let Some(page) = session.next_page().await {
        pages.push(page);
    }
    let summary = session.finish().await.unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(summary.failed_branches, 1);
}

#[tokio::test]
async fn test_abort_policy_fails_crawl() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<title>Home</title><a href="/report.pdf">Report</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let config = create_test_config(2, ErrorPolicy::Abort);
    let mut session = start_crawl(&config, &server.uri()).unwrap();

    // the seed page was already emitted before the failure
    let first = session.next_page().await.unwrap();
    assert_eq!(first.title, "Home");

    let result = session.finish().await;
    assert!(matches!(result, Err(CrawlError::ParseFailed { .. })));
}

#[tokio::test]
async fn test_abort_policy_collect_returns_error() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<title>Home</title><a href="http://127.0.0.1:1/dead">Dead</a>"#,
    )
    .await;

    let config = create_test_config(2, ErrorPolicy::Abort);
    let result = collect_pages(&config, &server.uri()).await;

    assert!(matches!(result, Err(CrawlError::FetchFailed { .. })));
}

#[tokio::test]
async fn test_concurrency_ceiling_still_completes() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<title>Home</title><a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
    )
    .await;
    mount_page(&server, "/a", r#"<title>A</title><a href="/b">B</a>"#).await;
    mount_page(&server, "/b", r#"<title>B</title><a href="/c">C</a>"#).await;
    mount_page(&server, "/c", r#"<title>C</title><a href="/a">A</a>"#).await;

    let mut config = create_test_config(4, ErrorPolicy::SkipBranch);
    config.crawler.max_concurrent_fetches = Some(1);

    let pages = collect_pages(&config, &server.uri()).await.unwrap();
    assert_eq!(pages.len(), 4);
}

#[tokio::test]
async fn test_rendered_output() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<title>Home</title><a href="/about">About</a>"#,
    )
    .await;

    let config = create_test_config(1, ErrorPolicy::SkipBranch);
    let pages = collect_pages(&config, &server.uri()).await.unwrap();

    assert_eq!(render_page(&pages[0]), "/ \"Home\"\n /about\n");
}

#[tokio::test]
async fn test_malformed_seed_rejected() {
    let config = create_test_config(2, ErrorPolicy::SkipBranch);

    assert!(matches!(
        start_crawl(&config, "not a url"),
        Err(CrawlError::MalformedUrl(_))
    ));
    assert!(matches!(
        start_crawl(&config, "ftp://example.com/"),
        Err(CrawlError::MalformedUrl(_))
    ));
}

#[tokio::test]
async fn test_redirect_target_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/home"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(html(
            r#"<title>Home</title><a href="/home">Home</a><a href="/about">About</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(r#"<title>About</title><a href="/start">Start</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(3, ErrorPolicy::SkipBranch);
    let pages = collect_pages(&config, &format!("{}/start", server.uri()))
        .await
        .unwrap();

    let titles: Vec<&str> = pages.iter().map(|page| page.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "About"]);
    assert_eq!(pages[0].url.path(), "/start");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_diamond_shared_page_fetched_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<title>Home</title>
        <a href="/a">A</a><a href="/b">B</a><a href="/c">C</a><a href="/d">D</a>"#,
    )
    .await;
    mount_page(&server, "/a", r#"<title>A</title><a href="/shared">S</a>"#).await;
    mount_page(&server, "/b", r#"<title>B</title><a href="/shared/">S</a>"#).await;
    mount_page(&server, "/c", r#"<title>C</title><a href="/shared#top">S</a>"#).await;
    mount_page(&server, "/d", r#"<title>D</title><a href="/./shared">S</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html(r#"<title>Shared</title><a href="/">Home</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(4, ErrorPolicy::SkipBranch);
    let mut session = start_crawl(&config, &server.uri()).unwrap();

    let mut pages = Vec::new();
    while let Some(page) = session.next_page().await {
        pages.push(page);
    }
    let summary = session.finish().await.unwrap();

    assert_eq!(pages.len(), 6);
    assert_eq!(find(&pages, "/shared").depth, 2);
    assert_eq!(summary.urls_claimed, 6);
    assert_eq!(summary.failed_branches, 0);
}
