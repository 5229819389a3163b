//! URL handling module for seo-audit
//!
//! This module provides URL normalization (used as the dedup key for probed
//! links), host extraction, and the same-site test used by the link crawler.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, is_same_host};
pub use normalize::normalize_url;

/// Returns true for schemes the fetcher can retrieve
pub fn is_http_scheme(url: &::url::Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
