//! Link scanner tests

use crate::{page_linking, test_config, test_fetcher};
use seo_audit::config::Config;
use seo_audit::crawler::{FetchError, LinkScanner, Recommendation};
use seo_audit::SeoError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_head(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Answers both HEAD and the GET retry the same way
async fn mount_any(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(301).insert_header("Location", location)
}

fn scanner(config: &Config) -> LinkScanner {
    LinkScanner::new(test_fetcher(config), config.crawler.clone())
}

#[tokio::test]
async fn test_scan_classifies_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/a", "/b", "/c", "/d", "/e"])).await;
    mount_head(&server, "/a", ResponseTemplate::new(404)).await;
    mount_head(&server, "/b", redirect_to("/c")).await;
    for ok in ["/c", "/d", "/e"] {
        mount_head(&server, ok, ResponseTemplate::new(200)).await;
    }

    let result = scanner(&test_config())
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .expect("Scan failed");

    assert_eq!(result.total, 5);
    assert_eq!(result.probed, 5);
    assert!(!result.incomplete);

    assert_eq!(result.broken.len(), 1);
    let broken = &result.broken[0];
    assert_eq!(broken.url, format!("{}/a", base));
    assert_eq!(broken.status, 404);
    assert_eq!(broken.classification, Recommendation::Redirect);
    assert_eq!(broken.found_on, vec![format!("{}/", base)]);

    assert_eq!(result.redirects.len(), 1);
    let redirect = &result.redirects[0];
    assert_eq!(redirect.from, format!("{}/b", base));
    assert_eq!(redirect.to, format!("{}/c", base));
    assert_eq!(redirect.status, 301);
    assert_eq!(redirect.chain, vec![format!("{}/b", base)]);
}

#[tokio::test]
async fn test_results_follow_discovery_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/slow", "/fast", "/error"])).await;
    mount_any(
        &server,
        "/slow",
        ResponseTemplate::new(500).set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_any(&server, "/fast", ResponseTemplate::new(404)).await;
    mount_any(&server, "/error", ResponseTemplate::new(503)).await;

    let result = scanner(&test_config())
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    let urls: Vec<&str> = result.broken.iter().map(|b| b.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/slow", base),
            format!("{}/fast", base),
            format!("{}/error", base)
        ]
    );
    assert_eq!(result.broken[0].classification, Recommendation::Fix);
    assert_eq!(result.broken[1].classification, Recommendation::Redirect);
}

#[tokio::test]
async fn test_multi_hop_redirect_chain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/old"])).await;
    mount_head(&server, "/old", redirect_to("/mid")).await;
    mount_head(
        &server,
        "/mid",
        ResponseTemplate::new(302).insert_header("Location", "/new"),
    )
    .await;
    mount_head(&server, "/new", ResponseTemplate::new(200)).await;

    let result = scanner(&test_config())
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.broken.is_empty());
    assert_eq!(result.redirects.len(), 1);
    let redirect = &result.redirects[0];
    assert_eq!(redirect.to, format!("{}/new", base));
    assert_eq!(redirect.status, 301);
    assert_eq!(
        redirect.chain,
        vec![format!("{}/old", base), format!("{}/mid", base)]
    );
}

#[tokio::test]
async fn test_single_hop_when_following_disabled() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/old"])).await;
    mount_head(&server, "/old", redirect_to("/mid")).await;
    mount_head(&server, "/mid", redirect_to("/new")).await;

    let mut config = test_config();
    config.crawler.follow_redirects = false;

    let result = scanner(&config)
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.redirects.len(), 1);
    assert_eq!(result.redirects[0].to, format!("{}/mid", base));
    assert_eq!(result.redirects[0].chain, vec![format!("{}/old", base)]);
}

#[tokio::test]
async fn test_redirect_loop_is_broken() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/ping"])).await;
    mount_head(&server, "/ping", redirect_to("/pong")).await;
    mount_head(&server, "/pong", redirect_to("/ping")).await;

    let result = scanner(&test_config())
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.redirects.is_empty());
    assert_eq!(result.broken.len(), 1);
    assert_eq!(result.broken[0].classification, Recommendation::Fix);
    assert_eq!(result.broken[0].status, 301);
}

#[tokio::test]
async fn test_hop_cap_is_broken() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/r1"])).await;
    mount_head(&server, "/r1", redirect_to("/r2")).await;
    mount_head(&server, "/r2", redirect_to("/r3")).await;
    mount_head(&server, "/r3", ResponseTemplate::new(200)).await;

    let mut config = test_config();
    config.crawler.max_redirect_hops = 1;

    let result = scanner(&config)
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.broken.len(), 1);
    assert_eq!(result.broken[0].classification, Recommendation::Fix);
}

#[tokio::test]
async fn test_single_redirect_allowed_at_hop_cap_one() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/r1"])).await;
    mount_head(&server, "/r1", redirect_to("/r2")).await;
    mount_head(&server, "/r2", ResponseTemplate::new(200)).await;

    let mut config = test_config();
    config.crawler.max_redirect_hops = 1;

    let result = scanner(&config)
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.broken.is_empty());
    assert_eq!(result.redirects.len(), 1);
    assert_eq!(result.redirects[0].to, format!("{}/r2", base));
}

#[tokio::test]
async fn test_chain_of_exactly_max_hops_is_redirect() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/r1"])).await;
    mount_head(&server, "/r1", redirect_to("/r2")).await;
    mount_head(&server, "/r2", redirect_to("/r3")).await;
    mount_head(&server, "/r3", redirect_to("/done")).await;
    mount_head(&server, "/done", ResponseTemplate::new(200)).await;

    let mut config = test_config();
    config.crawler.max_redirect_hops = 3;

    let result = scanner(&config)
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.broken.is_empty());
    assert_eq!(result.redirects.len(), 1);
    let redirect = &result.redirects[0];
    assert_eq!(redirect.to, format!("{}/done", base));
    assert_eq!(redirect.chain.len(), 3);
    assert_eq!(redirect.status, 301);
}

#[tokio::test]
async fn test_head_forbidden_falls_back_to_get() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/guarded"])).await;
    mount_head(&server, "/guarded", ResponseTemplate::new(403)).await;
    Mock::given(method("GET"))
        .and(path("/guarded"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = scanner(&test_config())
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_clean());
    assert_eq!(result.probed, 1);
}

#[tokio::test]
async fn test_get_status_decides_after_head_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/gone"])).await;
    mount_head(&server, "/gone", ResponseTemplate::new(404)).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let result = scanner(&test_config())
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.broken.len(), 1);
    assert_eq!(result.broken[0].status, 410);
    assert_eq!(result.broken[0].classification, Recommendation::Fix);
}

#[tokio::test]
async fn test_head_not_allowed_falls_back_to_get() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/no-head"])).await;
    mount_head(&server, "/no-head", ResponseTemplate::new(405)).await;
    Mock::given(method("GET"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = scanner(&test_config())
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_clean());
    assert_eq!(result.probed, 1);
}

#[tokio::test]
async fn test_unreachable_link_is_removed() {
    let server = MockServer::start().await;
    let base = server.uri();

    let html = r#"<html><body><a href="http://127.0.0.1:1/gone">Gone</a></body></html>"#;
    mount_page(&server, "/", html.to_string()).await;

    let mut config = test_config();
    config.crawler.include_external = true;

    let result = scanner(&config)
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.broken.len(), 1);
    assert_eq!(result.broken[0].status, 0);
    assert_eq!(result.broken[0].classification, Recommendation::Remove);
    assert!(result.broken[0].error.is_some());
}

#[tokio::test]
async fn test_probe_timeout_is_broken_not_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/slow", "/ok"])).await;
    mount_head(
        &server,
        "/slow",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_head(&server, "/ok", ResponseTemplate::new(200)).await;

    let mut config = test_config();
    config.fetcher.request_timeout_ms = 300;

    let result = scanner(&config)
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.probed, 2);
    assert_eq!(result.broken.len(), 1);
    assert_eq!(result.broken[0].url, format!("{}/slow", base));
    assert_eq!(result.broken[0].status, 0);
}

#[tokio::test]
async fn test_found_on_merged_across_seeds() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/one", page_linking(&["/dead", "/only-one"])).await;
    mount_page(&server, "/two", page_linking(&["/dead"])).await;
    mount_head(&server, "/dead", ResponseTemplate::new(404)).await;
    mount_head(&server, "/only-one", ResponseTemplate::new(200)).await;

    let seeds = vec![format!("{}/one", base), format!("{}/two", base)];
    let result = scanner(&test_config())
        .scan_many(&seeds, 20, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.broken.len(), 1);
    assert_eq!(result.broken[0].found_on, seeds);
}

#[tokio::test]
async fn test_max_links_caps_probes() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/1", "/2", "/3", "/4"])).await;
    for p in ["/1", "/2", "/3", "/4"] {
        mount_head(&server, p, ResponseTemplate::new(404)).await;
    }

    let result = scanner(&test_config())
        .scan(&format!("{}/", base), 2, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.total, 2);
    let urls: Vec<&str> = result.broken.iter().map(|b| b.url.as_str()).collect();
    assert_eq!(urls, vec![format!("{}/1", base), format!("{}/2", base)]);
}

#[tokio::test]
async fn test_cancellation_returns_partial_result() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/fast", "/slow"])).await;
    mount_head(&server, "/fast", ResponseTemplate::new(404)).await;
    mount_head(
        &server,
        "/slow",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut config = test_config();
    config.fetcher.request_timeout_ms = 10_000;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = scanner(&config)
        .scan(&format!("{}/", base), 20, &cancel)
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(result.incomplete);
    assert_eq!(result.total, 2);
    assert_eq!(result.probed, 1);
    assert_eq!(result.broken.len(), 1);
    assert_eq!(result.broken[0].url, format!("{}/fast", base));
}

#[tokio::test]
async fn test_scan_deadline_returns_partial_result() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page_linking(&["/slow"])).await;
    mount_head(
        &server,
        "/slow",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut config = test_config();
    config.fetcher.request_timeout_ms = 10_000;
    config.crawler.scan_timeout_ms = Some(300);

    let result = scanner(&config)
        .scan(&format!("{}/", base), 20, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.incomplete);
    assert_eq!(result.probed, 0);
}

#[tokio::test]
async fn test_unfetchable_seed_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = scanner(&test_config())
        .scan(&format!("{}/", server.uri()), 20, &CancellationToken::new())
        .await;

    match result {
        Err(SeoError::Fetch(FetchError::Http { status, .. })) => assert_eq!(status, 500),
        other => panic!("expected HTTP fetch error, got {:?}", other),
    }
}
