//! Concurrent link checking for one or more seed pages
//!
//! The scanner:
//! - Collects the distinct links of each seed page (capped, discovery order)
//! - Probes them through a fixed-size pool (semaphore + join set)
//! - Follows redirect hops with a loop guard
//! - Stops early on cancellation or deadline, keeping finished probes

use crate::config::CrawlerConfig;
use crate::crawler::classify::{LinkProbeResult, LinkVerdict, RedirectRecord, Recommendation};
use crate::crawler::fetcher::{Fetcher, ProbeOutcome};
use crate::document::ParsedDocument;
use crate::url::normalize_url;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Outcome of a link scan
///
/// `broken` and `redirects` are ordered by link discovery order, so a fixed
/// set of pages always yields the same sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkScanResult {
    /// Seed pages whose links were collected
    pub seeds: Vec<String>,
    /// Distinct links selected for probing
    pub total: usize,
    /// Links whose probe finished
    pub probed: usize,
    pub broken: Vec<LinkProbeResult>,
    pub redirects: Vec<RedirectRecord>,
    /// True when cancellation or the deadline cut the scan short
    pub incomplete: bool,
}

impl LinkScanResult {
    pub fn is_clean(&self) -> bool {
        self.broken.is_empty() && self.redirects.is_empty()
    }
}

/// A distinct link awaiting its probe
#[derive(Debug, Clone)]
struct Candidate {
    url: Url,
    found_on: Vec<String>,
}

/// Link checker bound to a fetcher and crawl limits
#[derive(Debug, Clone)]
pub struct LinkScanner {
    fetcher: Fetcher,
    config: CrawlerConfig,
}

impl LinkScanner {
    pub fn new(fetcher: Fetcher, config: CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Fetches `seed` and checks up to `max_links` of its links
    ///
    /// Failing to fetch the seed page is the only hard error; every link
    /// fault is folded into the result.
    pub async fn scan(
        &self,
        seed: &str,
        max_links: usize,
        cancel: &CancellationToken,
    ) -> Result<LinkScanResult> {
        self.scan_many(&[seed.to_string()], max_links, cancel).await
    }

    /// Scans several seed pages in one run
    ///
    /// A link found on more than one seed is probed once and lists every
    /// seed in `found_on`. Unreachable seeds are skipped; the scan fails
    /// only when no seed could be fetched.
    pub async fn scan_many(
        &self,
        seeds: &[String],
        max_links: usize,
        cancel: &CancellationToken,
    ) -> Result<LinkScanResult> {
        let mut documents = Vec::with_capacity(seeds.len());
        let mut last_error = None;

        for seed in seeds {
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!("Link scan cancelled while fetching seed {}", seed);
                    break;
                }
                fetched = self.fetcher.fetch_document(seed) => fetched,
            };

            match fetched {
                Ok(document) => documents.push(document),
                Err(e) => {
                    tracing::warn!("Failed to fetch seed page {}: {}", seed, e);
                    last_error = Some(e);
                }
            }
        }

        if documents.is_empty() {
            if let Some(e) = last_error {
                return Err(e.into());
            }
        }

        Ok(self.scan_documents(&documents, max_links, cancel).await)
    }

    /// Checks the links of pages that were already fetched
    pub async fn scan_documents(
        &self,
        documents: &[ParsedDocument],
        max_links: usize,
        cancel: &CancellationToken,
    ) -> LinkScanResult {
        let candidates = self.collect_candidates(documents, max_links);
        tracing::info!(
            "Probing {} links from {} page(s) with concurrency {}",
            candidates.len(),
            documents.len(),
            self.config.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, candidate) in candidates.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = self.fetcher.clone();
            let url = candidate.url.clone();
            let follow = self.config.follow_redirects;
            let max_hops = self.config.max_redirect_hops;

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                Some((index, resolve_link(&fetcher, url, follow, max_hops).await))
            });
        }

        let deadline = self
            .config
            .scan_timeout_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));
        let mut verdicts: Vec<(usize, LinkVerdict)> = Vec::with_capacity(candidates.len());
        let mut incomplete = false;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!(
                        "Link scan cancelled after {} of {} probes",
                        verdicts.len(),
                        candidates.len()
                    );
                    incomplete = true;
                    break;
                }
                _ = wait_until(deadline) => {
                    tracing::warn!(
                        "Link scan deadline reached after {} of {} probes",
                        verdicts.len(),
                        candidates.len()
                    );
                    incomplete = true;
                    break;
                }
                joined = tasks.join_next() => match joined {
                    Some(Ok(Some(verdict))) => verdicts.push(verdict),
                    Some(Ok(None)) => {}
                    Some(Err(e)) => tracing::warn!("Link probe task failed: {}", e),
                    None => break,
                },
            }
        }
        tasks.abort_all();

        verdicts.sort_by_key(|(index, _)| *index);

        let mut result = LinkScanResult {
            seeds: documents.iter().map(|doc| doc.url.clone()).collect(),
            total: candidates.len(),
            probed: verdicts.len(),
            incomplete,
            ..Default::default()
        };

        for (index, verdict) in verdicts {
            let candidate = &candidates[index];
            match verdict {
                LinkVerdict::Ok => {}
                LinkVerdict::Broken {
                    status,
                    error,
                    recommendation,
                } => result.broken.push(LinkProbeResult {
                    url: candidate.url.to_string(),
                    status,
                    error,
                    found_on: candidate.found_on.clone(),
                    classification: recommendation,
                }),
                LinkVerdict::Redirect { to, status, chain } => {
                    result.redirects.push(RedirectRecord {
                        from: candidate.url.to_string(),
                        to,
                        status,
                        chain,
                        found_on: candidate.found_on.clone(),
                    })
                }
            }
        }

        tracing::info!(
            "Link scan finished: {} probed, {} broken, {} redirects",
            result.probed,
            result.broken.len(),
            result.redirects.len()
        );

        result
    }

    /// Distinct links per seed, in discovery order
    ///
    /// Links are keyed by their normalized form. The seed itself is skipped,
    /// external links are skipped unless configured, and each seed
    /// contributes at most `max_links` links.
    fn collect_candidates(&self, documents: &[ParsedDocument], max_links: usize) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut index_by_key: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let seed_key = normalize_url(&doc.url).ok().map(|url| url.to_string());
            let mut taken = 0;

            for anchor in &doc.links {
                if taken >= max_links {
                    break;
                }
                if !anchor.internal && !self.config.include_external {
                    continue;
                }

                let Ok(normalized) = normalize_url(&anchor.href) else {
                    tracing::debug!("Skipping unnormalizable link {}", anchor.href);
                    continue;
                };
                let key = normalized.to_string();
                if seed_key.as_deref() == Some(key.as_str()) {
                    continue;
                }

                match index_by_key.get(&key) {
                    Some(&index) => {
                        let found_on = &mut candidates[index].found_on;
                        if found_on.contains(&doc.url) {
                            continue;
                        }
                        found_on.push(doc.url.clone());
                    }
                    None => {
                        let Ok(url) = Url::parse(&anchor.href) else {
                            continue;
                        };
                        index_by_key.insert(key, candidates.len());
                        candidates.push(Candidate {
                            url,
                            found_on: vec![doc.url.clone()],
                        });
                    }
                }
                taken += 1;
            }
        }

        candidates
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Probes one link, following redirects when enabled
///
/// `chain` collects every URL that answered with a redirect. A revisited URL
/// or more than `max_hops` redirects turns the link into a broken one.
async fn resolve_link(fetcher: &Fetcher, url: Url, follow: bool, max_hops: usize) -> LinkVerdict {
    let mut chain: Vec<String> = Vec::new();
    let mut first_status = None;
    let mut current = url;

    loop {
        let (status, location) = match fetcher.probe(&current).await {
            ProbeOutcome::Response { status, location } => (status, location),
            ProbeOutcome::Failed(error) => return LinkVerdict::unreachable(error.to_string()),
        };

        if !(300..400).contains(&status) {
            return match (first_status, LinkVerdict::from_status(status)) {
                (Some(first), LinkVerdict::Ok) => LinkVerdict::Redirect {
                    to: current.to_string(),
                    status: first,
                    chain,
                },
                (_, verdict) => verdict,
            };
        }

        chain.push(current.to_string());
        first_status.get_or_insert(status);

        let Some(next) = location else {
            return LinkVerdict::Broken {
                status,
                error: Some("Redirect without Location header".to_string()),
                recommendation: Recommendation::Fix,
            };
        };

        if !follow {
            return LinkVerdict::Redirect {
                to: next.to_string(),
                status,
                chain,
            };
        }

        if chain.iter().any(|hop| hop == next.as_str()) {
            return LinkVerdict::Broken {
                status,
                error: Some(format!("Redirect loop at {}", next)),
                recommendation: Recommendation::Fix,
            };
        }

        if chain.len() > max_hops {
            return LinkVerdict::Broken {
                status,
                error: Some(format!("More than {} redirect hops", max_hops)),
                recommendation: Recommendation::Fix,
            };
        }

        tracing::debug!("Following redirect {} -> {}", current, next);
        current = next;
    }
}
