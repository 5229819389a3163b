//! Integration tests against mock HTTP servers
//!
//! These tests use wiremock to stand in for audited sites and for the
//! IndexNow endpoint.

mod audit_tests;
mod indexing_tests;
mod link_scan_tests;

use seo_audit::config::Config;
use seo_audit::crawler::Fetcher;

/// Default configuration with short timeouts for tests
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.fetcher.request_timeout_ms = 2_000;
    config.fetcher.connect_timeout_ms = 1_000;
    config.user_agent.name = "TestBot".to_string();
    config
}

pub fn test_fetcher(config: &Config) -> Fetcher {
    Fetcher::new(config).expect("Failed to build HTTP client")
}

/// Wraps anchors for `paths` in a minimal HTML page
pub fn page_linking(paths: &[&str]) -> String {
    let anchors: String = paths
        .iter()
        .map(|p| format!(r#"<a href="{}">Read about {}</a>"#, p, p.trim_start_matches('/')))
        .collect();
    format!(
        "<html><head><title>Links</title></head><body><h1>Links</h1>{}</body></html>",
        anchors
    )
}
