//! IndexNow submission tests

use seo_audit::config::IndexingConfig;
use seo_audit::indexing::{IndexNowSubmitter, IndexingError, SubmissionStatus};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn submitter(endpoint: String) -> IndexNowSubmitter {
    let config = IndexingConfig {
        endpoint,
        key_location: None,
    };
    IndexNowSubmitter::new(reqwest::Client::new(), &config).expect("valid endpoint")
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

#[tokio::test]
async fn test_successful_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexnow"))
        .and(body_json(json!({
            "host": "shop.example",
            "key": "abc123",
            "keyLocation": "https://shop.example/abc123.txt",
            "urlList": ["https://shop.example/a", "https://shop.example/b"],
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let report = submitter(format!("{}/indexnow", server.uri()))
        .submit(
            &urls(&["https://shop.example/a", "https://shop.example/b"]),
            "abc123",
        )
        .await
        .unwrap();

    assert_eq!(report.status, SubmissionStatus::Success);
    assert_eq!(report.submitted.len(), 2);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn test_http_error_fails_whole_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexnow"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let batch = urls(&["https://shop.example/a", "https://shop.example/b"]);
    let report = submitter(format!("{}/indexnow", server.uri()))
        .submit(&batch, "abc123")
        .await
        .unwrap();

    assert_eq!(report.status, SubmissionStatus::Failed);
    assert!(report.submitted.is_empty());
    assert_eq!(report.retry_urls(), batch);
    assert_eq!(report.failed[0].error, "HTTP 422");
}

#[tokio::test]
async fn test_invalid_url_makes_partial_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexnow"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let report = submitter(format!("{}/indexnow", server.uri()))
        .submit(&urls(&["https://shop.example/a", "::not a url::"]), "abc123")
        .await
        .unwrap();

    assert_eq!(report.status, SubmissionStatus::Partial);
    assert_eq!(report.submitted, urls(&["https://shop.example/a"]));
    assert_eq!(report.retry_urls(), urls(&["::not a url::"]));
}

#[tokio::test]
async fn test_unreachable_endpoint_fails_every_url() {
    let report = submitter("http://127.0.0.1:1/indexnow".to_string())
        .submit(&urls(&["https://shop.example/a"]), "abc123")
        .await
        .unwrap();

    assert_eq!(report.status, SubmissionStatus::Failed);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].error.starts_with("Request failed"));
}

#[tokio::test]
async fn test_mixed_hosts_rejected_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = submitter(format!("{}/indexnow", server.uri()))
        .submit(
            &urls(&[
                "https://one.example/a",
                "https://two.example/b",
                "https://one.example/c",
            ]),
            "abc123",
        )
        .await;

    assert!(matches!(result, Err(IndexingError::MixedHosts { ref hosts }) if hosts.len() == 2));
}

#[tokio::test]
async fn test_submit_by_host_splits_batches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexnow"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let reports = submitter(format!("{}/indexnow", server.uri()))
        .submit_by_host(
            &urls(&[
                "https://one.example/a",
                "https://two.example/b",
                "https://one.example/c",
            ]),
            "abc123",
        )
        .await
        .unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(
        reports[0].submitted,
        urls(&["https://one.example/a", "https://one.example/c"])
    );
    assert_eq!(reports[1].submitted, urls(&["https://two.example/b"]));
    assert!(reports.iter().all(|r| r.status == SubmissionStatus::Success));
}

#[tokio::test]
async fn test_missing_key_fails_fast() {
    let result = submitter("http://127.0.0.1:1/indexnow".to_string())
        .submit(&urls(&["https://shop.example/a"]), "")
        .await;
    assert_eq!(result.unwrap_err(), IndexingError::MissingApiKey);
}
