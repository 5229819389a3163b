//! Markdown audit report generation
//!
//! Renders an audit (and optionally the link scan of the same page) as a
//! human-readable report with issues ordered by severity.

use crate::audit::{sort_issues_by_severity, AuditResult, Severity};
use crate::crawler::{LinkScanResult, Recommendation};
use crate::vitals::Rating;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for `audit` to `output_path`
pub fn write_markdown_report(
    audit: &AuditResult,
    links: Option<&LinkScanResult>,
    output_path: &Path,
) -> std::io::Result<()> {
    let markdown = format_markdown_report(audit, links);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats an audit as markdown
pub fn format_markdown_report(audit: &AuditResult, links: Option<&LinkScanResult>) -> String {
    let mut md = String::new();

    md.push_str(&format!("# SEO Audit: {}\n\n", audit.url));
    md.push_str(&format!("- **Score**: {}/100\n", audit.seo_score));
    md.push_str(&format!("- **Audited**: {}\n", audit.audited_at));
    md.push_str(&format!(
        "- **Issues**: {} high, {} medium, {} low\n\n",
        audit.issues_with(Severity::High).count(),
        audit.issues_with(Severity::Medium).count(),
        audit.issues_with(Severity::Low).count()
    ));

    // Issues
    md.push_str("## Issues\n\n");
    if audit.issues.is_empty() {
        md.push_str("No issues found.\n\n");
    } else {
        let mut issues = audit.issues.clone();
        sort_issues_by_severity(&mut issues);

        md.push_str("| Severity | Type | Description | Fix |\n");
        md.push_str("|----------|------|-------------|-----|\n");
        for issue in &issues {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                issue.severity,
                issue.issue_type,
                cell(&issue.description),
                cell(&issue.fix)
            ));
        }
        md.push('\n');
    }

    if !audit.optimizations.is_empty() {
        md.push_str("## Suggested Optimizations\n\n");
        for optimization in &audit.optimizations {
            md.push_str(&format!(
                "### {} ({} impact)\n\n",
                optimization.optimization_type, optimization.impact
            ));
            md.push_str(&format!("- **Current**: {}\n", or_none(&optimization.current)));
            md.push_str(&format!("- **Suggested**: {}\n\n", optimization.suggested));
        }
    }

    // Meta tags
    let meta = &audit.meta_analysis;
    md.push_str("## Meta Tags\n\n");
    md.push_str(&format!(
        "- **Title** ({} chars): {}\n",
        meta.title_length,
        or_none(&meta.title)
    ));
    md.push_str(&format!(
        "- **Description** ({} chars): {}\n",
        meta.description_length,
        or_none(&meta.description)
    ));
    if let Some(canonical) = &meta.canonical {
        md.push_str(&format!("- **Canonical**: {}\n", canonical));
    }
    md.push('\n');

    // Heading outline
    if !audit.heading_structure.is_empty() {
        md.push_str("## Heading Structure\n\n");
        for heading in &audit.heading_structure {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            md.push_str(&format!("{}- H{}: {}", indent, heading.level, or_none(&heading.text)));
            if !heading.issues.is_empty() {
                let issues: Vec<&str> = heading.issues.iter().map(String::as_str).collect();
                md.push_str(&format!(" _({})_", issues.join(", ")));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    let images = &audit.image_analysis;
    if images.total > 0 {
        md.push_str("## Images\n\n");
        md.push_str(&format!("- **Total**: {}\n", images.total));
        md.push_str(&format!("- **Missing alt text**: {}\n", images.missing_alt));
        md.push_str(&format!("- **Legacy formats**: {}\n\n", images.legacy_format));
    }

    if !audit.keyword_density.is_empty() {
        md.push_str("## Top Keywords\n\n");
        md.push_str("| Keyword | Count | Density |\n");
        md.push_str("|---------|-------|---------|\n");
        for entry in &audit.keyword_density {
            md.push_str(&format!(
                "| {} | {} | {:.2}% |\n",
                entry.keyword, entry.count, entry.density
            ));
        }
        md.push('\n');
    }

    if let Some(vitals) = &audit.vitals {
        md.push_str("## Core Web Vitals\n\n");
        md.push_str("| Metric | Value | Rating |\n");
        md.push_str("|--------|-------|--------|\n");
        for metric in &vitals.metrics {
            let rating = match metric.rating {
                Rating::Good => "good",
                Rating::NeedsImprovement => "needs improvement",
                Rating::Poor => "poor",
            };
            md.push_str(&format!("| {} | {} | {} |\n", metric.metric, metric.value, rating));
        }
        md.push('\n');
    }

    if let Some(scan) = links {
        format_link_scan(&mut md, scan);
    }

    md
}

fn format_link_scan(md: &mut String, scan: &LinkScanResult) {
    md.push_str("## Links\n\n");
    md.push_str(&format!(
        "- **Checked**: {} of {}{}\n",
        scan.probed,
        scan.total,
        if scan.incomplete { " (incomplete)" } else { "" }
    ));
    md.push_str(&format!("- **Broken**: {}\n", scan.broken.len()));
    md.push_str(&format!("- **Redirects**: {}\n\n", scan.redirects.len()));

    if !scan.broken.is_empty() {
        md.push_str("### Broken Links\n\n");
        md.push_str("| URL | Status | Action | Error |\n");
        md.push_str("|-----|--------|--------|-------|\n");
        for link in &scan.broken {
            let action = match link.classification {
                Recommendation::Fix => "fix",
                Recommendation::Redirect => "redirect",
                Recommendation::Remove => "remove",
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                link.url,
                link.status,
                action,
                cell(link.error.as_deref().unwrap_or(""))
            ));
        }
        md.push('\n');
    }

    if !scan.redirects.is_empty() {
        md.push_str("### Redirects\n\n");
        md.push_str("| From | To | Status | Hops |\n");
        md.push_str("|------|----|--------|------|\n");
        for redirect in &scan.redirects {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                redirect.from,
                redirect.to,
                redirect.status,
                redirect.chain.len()
            ));
        }
        md.push('\n');
    }
}

/// Escapes text for a table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn or_none(text: &str) -> &str {
    if text.is_empty() {
        "_(none)_"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::score;
    use crate::crawler::{LinkProbeResult, RedirectRecord};
    use crate::document::parse_document;
    use crate::vitals::VitalsSample;
    use tempfile::TempDir;
    use url::Url;

    fn sample_audit() -> AuditResult {
        let html = r#"<html><head><title>Home</title></head>
            <body><h1>Garden</h1><h3>Rakes | Hoes</h3><img src="a.png"></body></html>"#;
        let doc = parse_document(html, &Url::parse("https://example.com/").unwrap());
        score(
            &doc,
            Some(&VitalsSample {
                lcp: Some(3000.0),
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_report_sections() {
        let md = format_markdown_report(&sample_audit(), None);

        assert!(md.starts_with("# SEO Audit: https://example.com/\n"));
        assert!(md.contains("## Issues"));
        assert!(md.contains("| high | meta-description |"));
        assert!(md.contains("## Heading Structure"));
        assert!(md.contains("    - H3: Rakes | Hoes"));
        assert!(md.contains("| LCP | 3000 | needs improvement |"));
        assert!(!md.contains("## Links"));
    }

    #[test]
    fn test_high_issues_listed_first() {
        let md = format_markdown_report(&sample_audit(), None);
        let high = md.find("| high |").unwrap();
        let medium = md.find("| medium |").unwrap();
        assert!(high < medium);
    }

    #[test]
    fn test_link_scan_section() {
        let scan = LinkScanResult {
            seeds: vec!["https://example.com/".to_string()],
            total: 3,
            probed: 2,
            broken: vec![LinkProbeResult {
                url: "https://example.com/gone".to_string(),
                status: 404,
                error: Some("HTTP 404".to_string()),
                found_on: vec!["https://example.com/".to_string()],
                classification: Recommendation::Redirect,
            }],
            redirects: vec![RedirectRecord {
                from: "https://example.com/old".to_string(),
                to: "https://example.com/new".to_string(),
                status: 301,
                chain: vec!["https://example.com/old".to_string()],
                found_on: vec!["https://example.com/".to_string()],
            }],
            incomplete: true,
        };

        let md = format_markdown_report(&sample_audit(), Some(&scan));
        assert!(md.contains("- **Checked**: 2 of 3 (incomplete)"));
        assert!(md.contains("| https://example.com/gone | 404 | redirect | HTTP 404 |"));
        assert!(md.contains("| https://example.com/old | https://example.com/new | 301 | 1 |"));
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.md");

        write_markdown_report(&sample_audit(), None, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# SEO Audit"));
    }
}
