//! End-to-end session tests
//!
//! These tests run the real engine against wiremock servers through the
//! production `HttpFetcher`, asserting on reports and sink output.

use leadtrawl::config::{FetcherConfig, SessionConfig};
use leadtrawl::crawler::{run_session, Fetcher, HttpFetcher, SessionOutcome};
use leadtrawl::sink::{FileSink, MemorySink, Sink, SinkStream};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session config with short budgets suitable for mock sites
fn test_session_config() -> SessionConfig {
    SessionConfig {
        concurrency: 4,
        chunk_size: 1000,
        max_pages: 50,
        max_emails: 5,
        fetch_timeout_secs: 2,
    }
}

fn test_fetcher() -> Arc<dyn Fetcher> {
    Arc::new(HttpFetcher::new(&FetcherConfig::default(), Duration::from_secs(2)).unwrap())
}

fn html_response(body: impl Into<String>) -> ResponseTemplate {
    // `set_body_string` forces a `text/plain` content-type that a later
    // `insert_header` does not override, so set the body and its HTML
    // mime together via `set_body_raw`.
    ResponseTemplate::new(200).set_body_raw(body.into().into_bytes(), "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_session_crawls_site_and_finds_emails() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body>
        <a href="/about">About</a>
        <a href="/contact">Contact</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/about",
        r#"<html><body><a href="/">Home</a><p>We make widgets.</p></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/contact",
        r#"<html><body>
        <a href="mailto:info@acme-widgets.com">info@acme-widgets.com</a>
        </body></html>"#,
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let start = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = run_session(
        &start,
        &test_session_config(),
        test_fetcher(),
        Arc::clone(&sink) as Arc<dyn Sink>,
    )
    .await;

    assert_eq!(report.emails, vec!["info@acme-widgets.com"]);
    assert_eq!(report.pages_dispatched, 3);
    assert_eq!(report.outcome, SessionOutcome::FrontierExhausted);

    let log = sink.lines_for(SinkStream::Log);
    assert!(log.iter().any(|l| l.contains("Crawled:")));
    assert!(log
        .iter()
        .any(|l| l.contains("Found email: info@acme-widgets.com")));
}

#[tokio::test]
async fn test_asset_and_cross_domain_links_never_fetched() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body>
        <a href="/style.css">Styles</a>
        <a href="https://completely-elsewhere.test/page">External</a>
        <a href="/team">Team</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/team", "<html><body>no links</body></html>").await;

    // The stylesheet must never be requested.
    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let start = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = run_session(
        &start,
        &test_session_config(),
        test_fetcher(),
        Arc::new(MemorySink::new()),
    )
    .await;

    // Only "/" and "/team" are crawlable.
    assert_eq!(report.pages_dispatched, 2);
    assert_eq!(report.outcome, SessionOutcome::FrontierExhausted);
}

#[tokio::test]
async fn test_page_budget_limits_requests() {
    let server = MockServer::start().await;

    // Every page advertises the same 20 links, so the frontier never
    // empties before the page budget does.
    let mut body = String::from("<html><body>");
    for i in 0..20 {
        body.push_str(&format!(r#"<a href="/p{}">p{}</a>"#, i, i));
    }
    body.push_str("</body></html>");

    Mock::given(method("GET"))
        .respond_with(html_response(body))
        .mount(&server)
        .await;

    let config = SessionConfig {
        max_pages: 5,
        ..test_session_config()
    };
    let start = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = run_session(&start, &config, test_fetcher(), Arc::new(MemorySink::new())).await;

    assert_eq!(report.pages_dispatched, 5);
    assert_eq!(report.outcome, SessionOutcome::PageBudget);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_email_budget_stops_session_early() {
    let server = MockServer::start().await;

    // Each of the six pages carries two distinct addresses.
    let mut index = String::from("<html><body>");
    for i in 0..6 {
        index.push_str(&format!(r#"<a href="/office{}">office</a>"#, i));
    }
    index.push_str("</body></html>");
    mount_page(&server, "/", &index).await;

    for i in 0..6 {
        let body = format!(
            "<html><body>lead{0}@acme.example and boss{0}@acme.example</body></html>",
            i
        );
        mount_page(&server, &format!("/office{}", i), &body).await;
    }

    let config = SessionConfig {
        concurrency: 2,
        ..test_session_config()
    };
    let start = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = run_session(&start, &config, test_fetcher(), Arc::new(MemorySink::new())).await;

    assert_eq!(report.outcome, SessionOutcome::EmailBudget);
    // The budget of 5 is crossed inside the third batch (4 emails after
    // two office pages, 8 after four). That batch completes and nothing
    // further is dispatched.
    assert!(report.emails.len() >= 5 && report.emails.len() <= 8);
    assert_eq!(report.pages_dispatched, 5);
}

#[tokio::test]
async fn test_slow_page_does_not_block_batch_peers() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/hangs">h</a><a href="/answers">a</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hangs"))
        .respond_with(html_response("<html></html>").set_delay(Duration::from_secs(20)))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/answers",
        "<html><body>help@acme.example</body></html>",
    )
    .await;

    let config = SessionConfig {
        fetch_timeout_secs: 1,
        ..test_session_config()
    };
    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::new(&FetcherConfig::default(), Duration::from_secs(1)).unwrap());
    let sink = Arc::new(MemorySink::new());
    let start = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = run_session(&start, &config, fetcher, Arc::clone(&sink) as Arc<dyn Sink>).await;

    assert_eq!(report.emails, vec!["help@acme.example"]);
    assert_eq!(report.pages_dispatched, 3);

    let log = sink.lines_for(SinkStream::Log);
    assert!(log.iter().any(|l| l.contains("/hangs")
        && (l.contains("timed out") || l.contains("Error processing"))));
}

#[tokio::test]
async fn test_non_html_response_yields_no_emails() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/download">Download</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("binary-ish pdf@embedded.example content")
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let start = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = run_session(
        &start,
        &test_session_config(),
        test_fetcher(),
        Arc::new(MemorySink::new()),
    )
    .await;

    assert!(report.emails.is_empty());
    assert_eq!(report.pages_dispatched, 2);
}

#[tokio::test]
async fn test_http_error_is_isolated_to_one_page() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/gone">g</a><a href="/contact">c</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/contact",
        "<html><body>talk@acme.example</body></html>",
    )
    .await;

    let start = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = run_session(
        &start,
        &test_session_config(),
        test_fetcher(),
        Arc::new(MemorySink::new()),
    )
    .await;

    assert_eq!(report.emails, vec!["talk@acme.example"]);
    assert_eq!(report.outcome, SessionOutcome::FrontierExhausted);
}

#[tokio::test]
async fn test_session_writes_through_file_sink() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><body>hello@acme.example</body></html>",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.txt");
    let results_path = dir.path().join("emails.txt");
    let sink = Arc::new(FileSink::open(&log_path, &results_path).unwrap());

    let start = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = run_session(
        &start,
        &test_session_config(),
        test_fetcher(),
        sink as Arc<dyn Sink>,
    )
    .await;
    assert_eq!(report.emails, vec!["hello@acme.example"]);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("Crawled:"));
    assert!(log.contains("Found email: hello@acme.example"));
}
