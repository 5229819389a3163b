//! Audit result types handed to callers
//!
//! Everything here is plain data: the UI and storage layers consume it
//! without depending on the engine.

use crate::document::{Heading, ImageInfo, InternalLink, KeywordDensity};
use crate::vitals::VitalsReport;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(label)
    }
}

/// Issue category tags
pub mod category {
    pub const TITLE: &str = "title";
    pub const META_DESCRIPTION: &str = "meta-description";
    pub const HEADINGS: &str = "headings";
    pub const IMAGES: &str = "images";
    pub const LINKS: &str = "links";
    pub const PERFORMANCE: &str = "performance";
    pub const PARSE: &str = "parse";
    pub const STRUCTURED_DATA: &str = "structured-data";
}

/// One problem found on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditIssue {
    /// Category tag, see [`category`]
    #[serde(rename = "type")]
    pub issue_type: String,
    pub severity: Severity,
    pub description: String,
    pub fix: String,
}

impl AuditIssue {
    pub fn new(
        issue_type: &str,
        severity: Severity,
        description: impl Into<String>,
        fix: impl Into<String>,
    ) -> Self {
        Self {
            issue_type: issue_type.to_string(),
            severity,
            description: description.into(),
            fix: fix.into(),
        }
    }
}

/// A proposed rewrite; never affects the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    #[serde(rename = "type")]
    pub optimization_type: String,
    pub current: String,
    pub suggested: String,
    pub impact: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaAnalysis {
    pub title: String,
    pub title_length: usize,
    pub description: String,
    pub description_length: usize,
    pub keywords: String,
    pub canonical: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub total: usize,
    pub missing_alt: usize,
    pub legacy_format: usize,
    pub images: Vec<ImageInfo>,
}

/// Complete outcome of one page audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub url: String,
    /// RFC 3339 timestamp
    pub audited_at: String,
    /// 0-100, clamped
    pub seo_score: u8,
    /// Insertion order; see [`sort_issues_by_severity`] for display
    pub issues: Vec<AuditIssue>,
    pub optimizations: Vec<Optimization>,
    pub meta_analysis: MetaAnalysis,
    pub heading_structure: Vec<Heading>,
    pub image_analysis: ImageAnalysis,
    pub internal_links: Vec<InternalLink>,
    pub keyword_density: Vec<KeywordDensity>,
    pub vitals: Option<VitalsReport>,
}

impl AuditResult {
    /// Issues of the given severity
    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &AuditIssue> {
        self.issues.iter().filter(move |issue| issue.severity == severity)
    }
}

/// Orders issues high → medium → low, keeping insertion order within a band
pub fn sort_issues_by_severity(issues: &mut [AuditIssue]) {
    issues.sort_by_key(|issue| issue.severity);
}
