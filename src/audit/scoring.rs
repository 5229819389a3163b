//! Penalty-based scoring
//!
//! The score starts at 100 and every detected condition subtracts a fixed
//! penalty:
//!
//! | Condition | Penalty | Severity |
//! |-----------|---------|----------|
//! | Title missing | 20 | high |
//! | Title length < 30 or > 60 | 10 | medium |
//! | Meta description missing | 15 | high |
//! | Meta description length < 120 or > 160 | 8 | medium |
//! | No H1 | 15 | high |
//! | LCP > 4000ms / > 2500ms | 25 / 15 | high |
//! | FID > 300ms / > 100ms | 20 / 10 | high |
//! | CLS > 0.25 / > 0.1 | 25 / 15 | high |
//!
//! Vitals penalties apply only to measured fields. Other findings (images,
//! heading hierarchy, weak links, parse warnings) are reported as issues
//! without touching the score.

use crate::audit::suggestions::suggest_optimizations;
use crate::audit::types::{category, AuditIssue, AuditResult, ImageAnalysis, MetaAnalysis, Severity};
use crate::document::{analyze_content, ContentSummary, ParsedDocument};
use crate::vitals::{rate_vitals, VitalsSample};

pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MIN_CHARS: usize = 120;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

/// Running score plus the issues that explain it
struct Scorecard {
    score: i32,
    issues: Vec<AuditIssue>,
}

impl Scorecard {
    fn new() -> Self {
        Self {
            score: 100,
            issues: Vec::new(),
        }
    }

    fn penalize(&mut self, points: i32, issue: AuditIssue) {
        self.score -= points;
        self.issues.push(issue);
    }

    fn note(&mut self, issue: AuditIssue) {
        self.issues.push(issue);
    }

    fn final_score(&self) -> u8 {
        self.score.clamp(0, 100) as u8
    }
}

/// Scores a parsed document, optionally folding in measured vitals
///
/// # Example
///
/// ```
/// use seo_audit::audit::score;
/// use seo_audit::document::parse_document;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let doc = parse_document("<html><body><h1>Welcome</h1></body></html>", &base);
/// let result = score(&doc, None);
/// assert_eq!(result.seo_score, 100 - 20 - 15);
/// ```
pub fn score(doc: &ParsedDocument, vitals: Option<&VitalsSample>) -> AuditResult {
    let summary = analyze_content(doc);
    let mut card = Scorecard::new();

    check_title(doc, &mut card);
    check_meta_description(doc, &mut card);
    check_headings(&summary, &mut card);
    if let Some(sample) = vitals {
        check_vitals(sample, &mut card);
    }
    note_content_findings(doc, &summary, &mut card);

    let result = AuditResult {
        url: doc.url.clone(),
        audited_at: chrono::Utc::now().to_rfc3339(),
        seo_score: card.final_score(),
        optimizations: suggest_optimizations(doc, &summary),
        issues: card.issues,
        meta_analysis: MetaAnalysis {
            title: doc.title.clone(),
            title_length: doc.title.chars().count(),
            description: doc.meta_description.clone(),
            description_length: doc.meta_description.chars().count(),
            keywords: doc.meta_keywords.clone(),
            canonical: doc.canonical.clone(),
        },
        heading_structure: doc.headings.clone(),
        image_analysis: ImageAnalysis {
            total: summary.images_total,
            missing_alt: summary.images_missing_alt,
            legacy_format: summary.images_legacy_format,
            images: doc.images.clone(),
        },
        internal_links: doc.internal_links.clone(),
        keyword_density: summary.keyword_density,
        vitals: vitals.filter(|s| !s.is_empty()).map(rate_vitals),
    };

    tracing::debug!(
        "Scored {}: {} ({} issues)",
        result.url,
        result.seo_score,
        result.issues.len()
    );

    result
}

fn check_title(doc: &ParsedDocument, card: &mut Scorecard) {
    let length = doc.title.chars().count();

    if length == 0 {
        card.penalize(
            20,
            AuditIssue::new(
                category::TITLE,
                Severity::High,
                "Title missing",
                "Add a unique <title> of 30-60 characters describing the page",
            ),
        );
    } else if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&length) {
        card.penalize(
            10,
            AuditIssue::new(
                category::TITLE,
                Severity::Medium,
                format!("Title length is {} characters", length),
                format!(
                    "Keep the title between {} and {} characters",
                    TITLE_MIN_CHARS, TITLE_MAX_CHARS
                ),
            ),
        );
    }
}

fn check_meta_description(doc: &ParsedDocument, card: &mut Scorecard) {
    let length = doc.meta_description.chars().count();

    if length == 0 {
        card.penalize(
            15,
            AuditIssue::new(
                category::META_DESCRIPTION,
                Severity::High,
                "Meta description missing",
                "Add a <meta name=\"description\"> summarising the page in 120-160 characters",
            ),
        );
    } else if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&length) {
        card.penalize(
            8,
            AuditIssue::new(
                category::META_DESCRIPTION,
                Severity::Medium,
                format!("Meta description length is {} characters", length),
                format!(
                    "Keep the meta description between {} and {} characters",
                    DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS
                ),
            ),
        );
    }
}

fn check_headings(summary: &ContentSummary, card: &mut Scorecard) {
    if summary.h1_count == 0 {
        card.penalize(
            15,
            AuditIssue::new(
                category::HEADINGS,
                Severity::High,
                "No H1 heading found",
                "Add exactly one <h1> stating the main topic of the page",
            ),
        );
    } else if summary.h1_count > 1 {
        card.note(AuditIssue::new(
            category::HEADINGS,
            Severity::Medium,
            format!("Multiple H1 tags found ({})", summary.h1_count),
            "Keep a single <h1> and demote the others to <h2>",
        ));
    }

    if !summary.level_gaps.is_empty() {
        let gaps: Vec<String> = summary
            .level_gaps
            .iter()
            .map(|gap| format!("H{} → H{}", gap.from, gap.to))
            .collect();
        card.note(AuditIssue::new(
            category::HEADINGS,
            Severity::Low,
            format!("Heading levels skipped: {}", gaps.join(", ")),
            "Nest headings one level at a time",
        ));
    }
}

fn check_vitals(sample: &VitalsSample, card: &mut Scorecard) {
    if let Some(lcp) = sample.lcp {
        let penalty = if lcp > 4000.0 {
            25
        } else if lcp > 2500.0 {
            15
        } else {
            0
        };
        if penalty > 0 {
            card.penalize(
                penalty,
                AuditIssue::new(
                    category::PERFORMANCE,
                    Severity::High,
                    format!("Largest Contentful Paint is {:.0}ms", lcp),
                    "Optimize the hero image and server response time to reach LCP under 2.5s",
                ),
            );
        }
    }

    if let Some(fid) = sample.fid {
        let penalty = if fid > 300.0 {
            20
        } else if fid > 100.0 {
            10
        } else {
            0
        };
        if penalty > 0 {
            card.penalize(
                penalty,
                AuditIssue::new(
                    category::PERFORMANCE,
                    Severity::High,
                    format!("First Input Delay is {:.0}ms", fid),
                    "Break up long JavaScript tasks to reach FID under 100ms",
                ),
            );
        }
    }

    if let Some(cls) = sample.cls {
        let penalty = if cls > 0.25 {
            25
        } else if cls > 0.1 {
            15
        } else {
            0
        };
        if penalty > 0 {
            card.penalize(
                penalty,
                AuditIssue::new(
                    category::PERFORMANCE,
                    Severity::High,
                    format!("Cumulative Layout Shift is {:.3}", cls),
                    "Reserve space for images, ads and embeds to keep CLS under 0.1",
                ),
            );
        }
    }
}

fn note_content_findings(doc: &ParsedDocument, summary: &ContentSummary, card: &mut Scorecard) {
    if summary.images_missing_alt > 0 {
        card.note(AuditIssue::new(
            category::IMAGES,
            Severity::Medium,
            format!(
                "{} of {} images missing alt text",
                summary.images_missing_alt, summary.images_total
            ),
            "Describe each image in its alt attribute (under 125 characters)",
        ));
    }

    if summary.weak_internal_links > 0 {
        card.note(AuditIssue::new(
            category::LINKS,
            Severity::Low,
            format!(
                "{} internal links have weak anchor text",
                summary.weak_internal_links
            ),
            "Use descriptive anchor text instead of empty or generic phrases like \"click here\"",
        ));
    }

    for warning in &doc.warnings {
        card.note(AuditIssue::new(
            category::PARSE,
            Severity::High,
            warning.clone(),
            "Check that the page returns well-formed HTML",
        ));
    }

    // Only catalogued types are checked; pages embed many others.
    for block in &doc.structured_data {
        let catalogued = block
            .get("@type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|schema_type| crate::schema::lookup(schema_type).is_some());
        if !catalogued {
            continue;
        }

        let report = crate::schema::validate(block);
        if !report.is_valid {
            card.note(AuditIssue::new(
                category::STRUCTURED_DATA,
                Severity::Low,
                format!("Embedded JSON-LD is invalid: {}", report.errors.join("; ")),
                "Add the missing properties to the structured data block",
            ));
        }
    }
}
