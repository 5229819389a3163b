//! seo-audit: website SEO audit and optimization engine
//!
//! This crate fetches a live page, parses its markup, scores it against a
//! fixed penalty model, probes its links for breakage and redirects,
//! generates and validates JSON-LD markup, and submits URLs to an
//! IndexNow-compatible endpoint.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod document;
pub mod indexing;
pub mod output;
pub mod schema;
pub mod storage;
pub mod url;
pub mod vitals;

use thiserror::Error;

/// Main error type for seo-audit operations
#[derive(Debug, Error)]
pub enum SeoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Schema error: {0}")]
    Schema(#[from] schema::SchemaError),

    #[error("Indexing error: {0}")]
    Indexing(#[from] indexing::IndexingError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Operation cancelled for {url}")]
    Cancelled { url: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for seo-audit operations
pub type Result<T> = std::result::Result<T, SeoError>;

// Re-export commonly used types
pub use audit::{score, AuditIssue, AuditResult, Auditor, Severity};
pub use config::Config;
pub use crawler::{LinkScanResult, LinkScanner};
pub use document::{parse_document, ParsedDocument};
pub use indexing::{IndexNowSubmitter, SubmissionReport, SubmissionStatus};
pub use schema::{generate, validate, SchemaDocument};
pub use vitals::{VitalsAggregator, VitalsSample};
