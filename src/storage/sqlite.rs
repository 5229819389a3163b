//! SQLite storage implementation

use crate::audit::AuditResult;
use crate::crawler::LinkScanResult;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{AuditStore, StorageError, StorageResult, StoredAudit, StoredLinkScan};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const AUDIT_COLUMNS: &str = "id, config_hash, stored_at, result_json";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_audits(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<Vec<StoredAudit>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, raw_audit)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(decode_audit).collect()
    }
}

/// (id, config_hash, stored_at, json)
type RawAudit = (i64, String, String, String);

fn raw_audit(row: &Row<'_>) -> rusqlite::Result<RawAudit> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_audit((id, config_hash, stored_at, json): RawAudit) -> StorageResult<StoredAudit> {
    Ok(StoredAudit {
        id,
        config_hash,
        stored_at,
        result: serde_json::from_str(&json)?,
    })
}

impl AuditStore for SqliteStorage {
    fn save_audit(&mut self, audit: &AuditResult, config_hash: &str) -> StorageResult<i64> {
        let json = serde_json::to_string(audit)?;
        self.conn.execute(
            "INSERT INTO audits (url, seo_score, issue_count, config_hash, audited_at, stored_at, result_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                audit.url,
                audit.seo_score,
                audit.issues.len() as i64,
                config_hash,
                audit.audited_at,
                Utc::now().to_rfc3339(),
                json
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_audit(&self, id: i64) -> StorageResult<StoredAudit> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {} FROM audits WHERE id = ?1", AUDIT_COLUMNS),
                params![id],
                raw_audit,
            )
            .optional()?
            .ok_or(StorageError::NotFound(id))?;

        decode_audit(raw)
    }

    fn latest_audit(&self, url: &str) -> StorageResult<Option<StoredAudit>> {
        Ok(self.audit_history(url, 1)?.into_iter().next())
    }

    fn audit_history(&self, url: &str, limit: usize) -> StorageResult<Vec<StoredAudit>> {
        self.query_audits(
            &format!(
                "SELECT {} FROM audits WHERE url = ?1 ORDER BY id DESC LIMIT ?2",
                AUDIT_COLUMNS
            ),
            params![url, limit as i64],
        )
    }

    fn save_link_scan(&mut self, scan: &LinkScanResult) -> StorageResult<i64> {
        let json = serde_json::to_string(scan)?;
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO link_scans (total, broken_count, redirect_count, incomplete, scanned_at, result_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                scan.total as i64,
                scan.broken.len() as i64,
                scan.redirects.len() as i64,
                scan.incomplete,
                Utc::now().to_rfc3339(),
                json
            ],
        )?;
        let scan_id = tx.last_insert_rowid();

        for seed in &scan.seeds {
            tx.execute(
                "INSERT OR IGNORE INTO link_scan_seeds (scan_id, seed) VALUES (?1, ?2)",
                params![scan_id, seed],
            )?;
        }

        tx.commit()?;
        Ok(scan_id)
    }

    fn latest_link_scan(&self, seed: &str) -> StorageResult<Option<StoredLinkScan>> {
        let raw: Option<(i64, String, String)> = self
            .conn
            .query_row(
                "SELECT s.id, s.scanned_at, s.result_json
                 FROM link_scans s JOIN link_scan_seeds k ON k.scan_id = s.id
                 WHERE k.seed = ?1
                 ORDER BY s.id DESC LIMIT 1",
                params![seed],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        raw.map(|(id, scanned_at, json)| {
            Ok(StoredLinkScan {
                id,
                scanned_at,
                result: serde_json::from_str(&json)?,
            })
        })
        .transpose()
    }
}
