use serde::Deserialize;

/// Main configuration structure for seo-audit
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub crawler: CrawlerConfig,
    pub indexing: IndexingConfig,
    pub storage: StorageConfig,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Total time allowed for a single request (milliseconds)
    pub request_timeout_ms: u64,

    /// Time allowed to establish a connection (milliseconds)
    pub connect_timeout_ms: u64,

    /// Response bodies beyond this size are truncated
    pub max_body_bytes: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the bot
    pub name: String,

    /// Version of the bot
    pub version: String,

    /// URL with information about the bot
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "SeoAuditBot".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Link crawler configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of distinct links probed per seed page
    pub max_links: usize,

    /// Size of the probe worker pool
    pub concurrency: usize,

    /// Whether redirect chains are followed past the first hop
    pub follow_redirects: bool,

    /// Maximum hops followed before a chain is reported as broken
    pub max_redirect_hops: usize,

    /// Whether links to other hosts are probed too
    pub include_external: bool,

    /// Overall deadline for one scan (milliseconds)
    pub scan_timeout_ms: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_links: 20,
            concurrency: 5,
            follow_redirects: true,
            max_redirect_hops: 10,
            include_external: false,
            scan_timeout_ms: Some(60_000),
        }
    }
}

/// IndexNow endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndexingConfig {
    /// Endpoint receiving the POSTed URL batches
    pub endpoint: String,

    /// Location of the key file; defaults to `https://<host>/<key>.txt`
    pub key_location: Option<String>,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.indexnow.org/indexnow".to_string(),
            key_location: None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./seo-audit.db".to_string(),
        }
    }
}
