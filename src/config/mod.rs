//! Configuration module for seo-audit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use seo_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("seo-audit.toml")).unwrap();
//! println!("Probing at most {} links", config.crawler.max_links);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetcherConfig, IndexingConfig, StorageConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, config_hash, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
