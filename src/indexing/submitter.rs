//! IndexNow batch submission
//!
//! One POST per host carries the whole URL list. Per-URL faults end up in
//! [`SubmissionReport::failed`]; only caller mistakes (no key, no URLs,
//! mixed hosts) are returned as errors.

use crate::config::IndexingConfig;
use crate::indexing::IndexingError;
use crate::url::{extract_domain, is_http_scheme};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
    Partial,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSubmission {
    pub url: String,
    pub error: String,
}

/// Per-URL outcome of one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub submitted: Vec<String>,
    pub failed: Vec<FailedSubmission>,
    pub status: SubmissionStatus,
}

impl SubmissionReport {
    /// Builds a report, deriving `status` from the two lists
    pub fn new(submitted: Vec<String>, failed: Vec<FailedSubmission>) -> Self {
        let status = if submitted.is_empty() {
            SubmissionStatus::Failed
        } else if failed.is_empty() {
            SubmissionStatus::Success
        } else {
            SubmissionStatus::Partial
        };

        Self {
            submitted,
            failed,
            status,
        }
    }

    /// URLs worth resubmitting
    pub fn retry_urls(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.url.clone()).collect()
    }
}

/// Wire body of an IndexNow request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexNowRequest<'a> {
    host: &'a str,
    key: &'a str,
    key_location: String,
    url_list: Vec<&'a str>,
}

/// Posts URL batches to an IndexNow-compatible endpoint
#[derive(Debug, Clone)]
pub struct IndexNowSubmitter {
    client: Client,
    endpoint: Url,
    key_location: Option<String>,
}

impl IndexNowSubmitter {
    pub fn new(client: Client, config: &IndexingConfig) -> Result<Self, IndexingError> {
        let endpoint = Url::parse(&config.endpoint)
            .ok()
            .filter(is_http_scheme)
            .ok_or_else(|| IndexingError::InvalidEndpoint(config.endpoint.clone()))?;

        Ok(Self {
            client,
            endpoint,
            key_location: config.key_location.clone(),
        })
    }

    /// Submits a single-host batch
    ///
    /// # Errors
    ///
    /// * `MissingApiKey` - `api_key` is blank; nothing is sent
    /// * `EmptyBatch` - `urls` is empty
    /// * `MixedHosts` - the URLs name more than one host
    ///
    /// Unparseable URLs, transport failures and non-2xx answers are
    /// reported per URL in the returned report.
    pub async fn submit(
        &self,
        urls: &[String],
        api_key: &str,
    ) -> Result<SubmissionReport, IndexingError> {
        check_request(urls, api_key)?;

        let (valid, mut failed) = split_valid(urls);
        let hosts: BTreeSet<&str> = valid.iter().map(|(host, _)| host.as_str()).collect();
        if hosts.len() > 1 {
            return Err(IndexingError::MixedHosts {
                hosts: hosts.into_iter().map(str::to_string).collect(),
            });
        }

        let Some(host) = hosts.into_iter().next() else {
            return Ok(SubmissionReport::new(Vec::new(), failed));
        };
        let batch: Vec<&str> = valid.iter().map(|(_, url)| url.as_str()).collect();

        let body = IndexNowRequest {
            host,
            key: api_key.trim(),
            key_location: self
                .key_location
                .clone()
                .unwrap_or_else(|| format!("https://{}/{}.txt", host, api_key.trim())),
            url_list: batch.clone(),
        };

        tracing::info!("Submitting {} URLs for {} to {}", batch.len(), host, self.endpoint);

        let outcome = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await;

        let batch_error = match outcome {
            Ok(response) if response.status().is_success() => None,
            Ok(response) => Some(format!("HTTP {}", response.status().as_u16())),
            Err(e) if e.is_timeout() => Some("Request timed out".to_string()),
            Err(e) => Some(format!("Request failed: {}", e)),
        };

        let submitted = match batch_error {
            None => batch.iter().map(|url| url.to_string()).collect(),
            Some(error) => {
                tracing::warn!("IndexNow submission for {} failed: {}", host, error);
                failed.extend(batch.iter().map(|url| FailedSubmission {
                    url: url.to_string(),
                    error: error.clone(),
                }));
                Vec::new()
            }
        };

        Ok(SubmissionReport::new(submitted, failed))
    }

    /// Splits `urls` by host and submits each batch in turn
    ///
    /// Reports come back in first-seen host order; unparseable URLs are
    /// collected in a trailing report of their own.
    pub async fn submit_by_host(
        &self,
        urls: &[String],
        api_key: &str,
    ) -> Result<Vec<SubmissionReport>, IndexingError> {
        check_request(urls, api_key)?;

        let (valid, failed) = split_valid(urls);
        let mut batches: Vec<(String, Vec<String>)> = Vec::new();
        for (host, url) in valid {
            match batches.iter_mut().find(|(existing, _)| *existing == host) {
                Some((_, batch)) => batch.push(url),
                None => batches.push((host, vec![url])),
            }
        }

        let mut reports = Vec::with_capacity(batches.len() + 1);
        for (_, batch) in &batches {
            reports.push(self.submit(batch, api_key).await?);
        }
        if !failed.is_empty() {
            reports.push(SubmissionReport::new(Vec::new(), failed));
        }

        Ok(reports)
    }
}

fn check_request(urls: &[String], api_key: &str) -> Result<(), IndexingError> {
    if api_key.trim().is_empty() {
        return Err(IndexingError::MissingApiKey);
    }
    if urls.is_empty() {
        return Err(IndexingError::EmptyBatch);
    }
    Ok(())
}

/// Separates submittable `(host, url)` pairs from invalid entries
fn split_valid(urls: &[String]) -> (Vec<(String, String)>, Vec<FailedSubmission>) {
    let mut valid = Vec::new();
    let mut failed = Vec::new();

    for raw in urls {
        let parsed = Url::parse(raw.trim())
            .ok()
            .filter(is_http_scheme)
            .and_then(|url| extract_domain(&url).map(|host| (host, url.to_string())));

        match parsed {
            Some(entry) => valid.push(entry),
            None => failed.push(FailedSubmission {
                url: raw.clone(),
                error: "Invalid URL".to_string(),
            }),
        }
    }

    (valid, failed)
}
