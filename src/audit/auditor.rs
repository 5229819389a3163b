//! Network-facing audit entry points

use crate::audit::scoring::score;
use crate::audit::types::AuditResult;
use crate::config::{Config, CrawlerConfig};
use crate::crawler::{Fetcher, LinkScanResult, LinkScanner};
use crate::document::ParsedDocument;
use crate::vitals::VitalsSample;
use crate::{Result, SeoError};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Page audit plus the link scan of the same page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAudit {
    pub audit: AuditResult,
    pub links: LinkScanResult,
}

/// Fetches pages and audits them
///
/// Holds no per-request state; one instance can serve any number of
/// concurrent audits.
#[derive(Debug, Clone)]
pub struct Auditor {
    fetcher: Fetcher,
    scanner: LinkScanner,
    max_links: usize,
}

impl Auditor {
    /// Builds an auditor with its own HTTP client
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = Fetcher::new(config)?;
        Ok(Self::with_fetcher(fetcher, config.crawler.clone()))
    }

    /// Builds an auditor around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, crawler: CrawlerConfig) -> Self {
        let max_links = crawler.max_links;
        Self {
            scanner: LinkScanner::new(fetcher.clone(), crawler),
            fetcher,
            max_links,
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn scanner(&self) -> &LinkScanner {
        &self.scanner
    }

    /// Fetches `url` and scores it
    ///
    /// # Errors
    ///
    /// * `SeoError::Fetch` - The page could not be fetched (including 4xx/5xx)
    /// * `SeoError::Cancelled` - `cancel` fired before the page arrived
    pub async fn audit(
        &self,
        url: &str,
        vitals: Option<&VitalsSample>,
        cancel: &CancellationToken,
    ) -> Result<AuditResult> {
        let document = self.fetch_document(url, cancel).await?;
        Ok(score(&document, vitals))
    }

    /// Audits `url` and checks its links, fetching the page once
    ///
    /// Cancellation after the page arrived still returns the audit; the
    /// link scan is then marked incomplete.
    pub async fn audit_site(
        &self,
        url: &str,
        vitals: Option<&VitalsSample>,
        cancel: &CancellationToken,
    ) -> Result<SiteAudit> {
        let document = self.fetch_document(url, cancel).await?;
        let audit = score(&document, vitals);
        let links = self
            .scanner
            .scan_documents(std::slice::from_ref(&document), self.max_links, cancel)
            .await;

        Ok(SiteAudit { audit, links })
    }

    /// Fetches and parses a page, honoring `cancel`
    pub async fn fetch_document(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ParsedDocument> {
        tracing::info!("Auditing {}", url);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SeoError::Cancelled { url: url.to_string() }),
            fetched = self.fetcher.fetch_document(url) => Ok(fetched?),
        }
    }
}
