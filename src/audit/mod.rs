//! Page auditing: scoring, issues and rewrite suggestions
//!
//! [`score`] is the pure core over a [`ParsedDocument`](crate::document::ParsedDocument);
//! [`Auditor`] wires it to the network.

mod auditor;
mod scoring;
mod suggestions;
mod types;

pub use auditor::{Auditor, SiteAudit};
pub use scoring::{
    score, DESCRIPTION_MAX_CHARS, DESCRIPTION_MIN_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
pub use suggestions::suggest_optimizations;
pub use types::{
    category, sort_issues_by_severity, AuditIssue, AuditResult, ImageAnalysis, MetaAnalysis,
    Optimization, Severity,
};
