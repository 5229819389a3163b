//! Storage module for persisting audit history
//!
//! This module handles:
//! - SQLite database initialization and schema management
//! - Audit results keyed by URL, with the config hash they ran under
//! - Link scan results keyed by seed page

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{AuditStore, StorageError, StorageResult, StoredAudit, StoredLinkScan};

use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}
