//! Database schema definitions
//!
//! Results are stored whole as JSON; the scalar columns exist for lookups
//! and for reading a history without decoding every row.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per page audit
CREATE TABLE IF NOT EXISTS audits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    seo_score INTEGER NOT NULL,
    issue_count INTEGER NOT NULL,
    config_hash TEXT NOT NULL,
    audited_at TEXT NOT NULL,
    stored_at TEXT NOT NULL,
    result_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_audits_url ON audits(url);

-- One row per link scan
CREATE TABLE IF NOT EXISTS link_scans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    total INTEGER NOT NULL,
    broken_count INTEGER NOT NULL,
    redirect_count INTEGER NOT NULL,
    incomplete INTEGER NOT NULL,
    scanned_at TEXT NOT NULL,
    result_json TEXT NOT NULL
);

-- Seed pages of each scan
CREATE TABLE IF NOT EXISTS link_scan_seeds (
    scan_id INTEGER NOT NULL REFERENCES link_scans(id) ON DELETE CASCADE,
    seed TEXT NOT NULL,
    PRIMARY KEY (scan_id, seed)
);

CREATE INDEX IF NOT EXISTS idx_link_scan_seeds_seed ON link_scan_seeds(seed);
"#;

/// Initializes the database schema
///
/// Safe to call on an existing database.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
