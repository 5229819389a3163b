//! End-to-end audit tests

use crate::{page_linking, test_config, test_fetcher};
use seo_audit::audit::{category, Auditor, Severity};
use seo_audit::crawler::FetchError;
use seo_audit::output::format_markdown_report;
use seo_audit::storage::{AuditStore, SqliteStorage};
use seo_audit::vitals::VitalsSample;
use seo_audit::SeoError;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GOOD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Garden Tools for Every Season | Example Shop</title>
  <meta name="description" content="Browse durable garden tools for every season: rakes, spades, pruners and hoses, tested by gardeners and shipped quickly to your door today.">
</head>
<body>
  <h1>Garden Tools</h1>
  <h2>Rakes</h2>
  <p>Garden tools that last. Our rakes and spades are made of forged steel.</p>
  <img src="/img/rake.webp" alt="Forged steel rake">
  <a href="/rakes">Browse all rakes</a>
</body>
</html>"#;

fn auditor() -> Auditor {
    let config = test_config();
    Auditor::with_fetcher(test_fetcher(&config), config.crawler)
}

async fn serve(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_audit_good_page() {
    let server = MockServer::start().await;
    serve(&server, "/", GOOD_PAGE).await;

    let result = auditor()
        .audit(&format!("{}/", server.uri()), None, &CancellationToken::new())
        .await
        .expect("Audit failed");

    assert_eq!(result.seo_score, 100);
    assert!(result.issues_with(Severity::High).next().is_none());
    assert_eq!(result.heading_structure.len(), 2);
    assert_eq!(result.image_analysis.total, 1);
    assert_eq!(result.image_analysis.missing_alt, 0);
    assert_eq!(result.internal_links.len(), 1);
    assert_eq!(result.keyword_density[0].keyword, "rakes");
    assert!(result.vitals.is_none());
}

#[tokio::test]
async fn test_audit_with_vitals() {
    let server = MockServer::start().await;
    serve(&server, "/", GOOD_PAGE).await;

    let vitals = VitalsSample {
        lcp: Some(4500.0),
        cls: Some(0.05),
        ..Default::default()
    };
    let result = auditor()
        .audit(&format!("{}/", server.uri()), Some(&vitals), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.seo_score, 75);
    let performance: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.issue_type == category::PERFORMANCE)
        .collect();
    assert_eq!(performance.len(), 1);
    assert_eq!(result.vitals.as_ref().map(|v| v.metrics.len()), Some(2));
}

#[tokio::test]
async fn test_audit_follows_redirect_and_resolves_against_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/shop/"))
        .mount(&server)
        .await;
    serve(&server, "/shop/", &page_linking(&["item"])).await;

    let result = auditor()
        .audit(&format!("{}/start", server.uri()), None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.url, format!("{}/shop/", server.uri()));
    assert_eq!(result.internal_links[0].href, format!("{}/shop/item", server.uri()));
}

#[tokio::test]
async fn test_audit_missing_page_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not found</h1>"))
        .mount(&server)
        .await;

    let result = auditor()
        .audit(&format!("{}/missing", server.uri()), None, &CancellationToken::new())
        .await;

    match result {
        Err(SeoError::Fetch(FetchError::Http { status, body, .. })) => {
            assert_eq!(status, 404);
            assert!(body.contains("Not found"));
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_audit_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(GOOD_PAGE)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = test_config();
    config.fetcher.request_timeout_ms = 200;
    let auditor = Auditor::with_fetcher(test_fetcher(&config), config.crawler);

    let result = auditor
        .audit(&format!("{}/", server.uri()), None, &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(SeoError::Fetch(ref e)) if e.is_timeout()));
}

#[tokio::test]
async fn test_audit_connection_refused() {
    let result = auditor()
        .audit("http://127.0.0.1:1/", None, &CancellationToken::new())
        .await;
    assert!(matches!(
        result,
        Err(SeoError::Fetch(FetchError::Connection { .. }))
    ));
}

#[tokio::test]
async fn test_audit_empty_body_is_recovered() {
    let server = MockServer::start().await;
    serve(&server, "/", "").await;

    let result = auditor()
        .audit(&format!("{}/", server.uri()), None, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result
        .issues
        .iter()
        .any(|i| i.issue_type == category::PARSE && i.severity == Severity::High));
    assert_eq!(result.seo_score, 100 - 20 - 15 - 15);
}

#[tokio::test]
async fn test_site_audit_report_and_storage() {
    let server = MockServer::start().await;
    serve(&server, "/", GOOD_PAGE).await;
    Mock::given(method("HEAD"))
        .and(path("/rakes"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let site = auditor()
        .audit_site(&format!("{}/", server.uri()), None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(site.links.total, 1);
    assert_eq!(site.links.broken.len(), 1);

    let report = format_markdown_report(&site.audit, Some(&site.links));
    assert!(report.contains("### Broken Links"));

    let dir = TempDir::new().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("audits.db")).unwrap();
    storage.save_audit(&site.audit, "test-hash").unwrap();
    storage.save_link_scan(&site.links).unwrap();

    let latest = storage.latest_audit(&site.audit.url).unwrap().unwrap();
    assert_eq!(latest.result, site.audit);
    assert_eq!(latest.config_hash, "test-hash");
    let scan = storage.latest_link_scan(&site.audit.url).unwrap().unwrap();
    assert_eq!(scan.result, site.links);
}
