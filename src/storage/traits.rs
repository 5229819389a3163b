//! Storage traits and error types

use crate::audit::AuditResult;
use crate::crawler::LinkScanResult;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted audit
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAudit {
    pub id: i64,
    /// Hash of the configuration the audit ran with
    pub config_hash: String,
    pub stored_at: String,
    pub result: AuditResult,
}

/// A persisted link scan
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLinkScan {
    pub id: i64,
    pub scanned_at: String,
    pub result: LinkScanResult,
}

/// Persistence for audit and link scan results
///
/// Lookups return the newest record first.
pub trait AuditStore {
    /// Saves an audit and returns its ID
    fn save_audit(&mut self, audit: &AuditResult, config_hash: &str) -> StorageResult<i64>;

    /// Gets an audit by ID
    fn get_audit(&self, id: i64) -> StorageResult<StoredAudit>;

    /// Most recent audit of `url`
    fn latest_audit(&self, url: &str) -> StorageResult<Option<StoredAudit>>;

    /// Up to `limit` audits of `url`, newest first
    fn audit_history(&self, url: &str, limit: usize) -> StorageResult<Vec<StoredAudit>>;

    /// Saves a link scan and returns its ID
    fn save_link_scan(&mut self, scan: &LinkScanResult) -> StorageResult<i64>;

    /// Most recent scan that included `seed`
    fn latest_link_scan(&self, seed: &str) -> StorageResult<Option<StoredLinkScan>>;
}
