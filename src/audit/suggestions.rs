//! Keyword-driven rewrite suggestions
//!
//! Suggestions are separate from issues and never change the score.

use crate::audit::types::{Optimization, Severity};
use crate::document::{ContentSummary, ParsedDocument};

const TITLE_KEYWORDS: usize = 3;
const DESCRIPTION_KEYWORDS: usize = 5;
const MIN_SENTENCE_CHARS: usize = 20;
const MAX_DESCRIPTION_CHARS: usize = 160;

/// Builds title, description and image suggestions for `doc`
pub fn suggest_optimizations(doc: &ParsedDocument, summary: &ContentSummary) -> Vec<Optimization> {
    let keywords: Vec<&str> = summary
        .keyword_density
        .iter()
        .map(|entry| entry.keyword.as_str())
        .collect();

    let mut optimizations = Vec::new();

    if let Some(suggested) = suggest_title(&doc.title, &keywords) {
        optimizations.push(Optimization {
            optimization_type: "title".to_string(),
            current: doc.title.clone(),
            suggested,
            impact: Severity::High,
        });
    }

    if let Some(suggested) = suggest_description(&doc.body_text, &keywords) {
        if suggested != doc.meta_description {
            optimizations.push(Optimization {
                optimization_type: "meta-description".to_string(),
                current: doc.meta_description.clone(),
                suggested,
                impact: Severity::High,
            });
        }
    }

    if summary.images_legacy_format > 0 {
        optimizations.push(Optimization {
            optimization_type: "images".to_string(),
            current: format!(
                "{} of {} images use legacy formats",
                summary.images_legacy_format, summary.images_total
            ),
            suggested: "Serve WebP or AVIF versions of these images".to_string(),
            impact: Severity::Medium,
        });
    }

    optimizations
}

/// Prepends the top keyword when the title contains none of the top three
fn suggest_title(title: &str, keywords: &[&str]) -> Option<String> {
    let top = *keywords.first()?;
    let lower_title = title.to_lowercase();

    if keywords
        .iter()
        .take(TITLE_KEYWORDS)
        .any(|keyword| lower_title.contains(keyword))
    {
        return None;
    }

    let lead = capitalize(top);
    if title.trim().is_empty() {
        Some(lead)
    } else {
        Some(format!("{} - {}", lead, title.trim()))
    }
}

/// First body sentence of reasonable length, followed by any top keywords it
/// lacks, cut to 160 characters
fn suggest_description(body_text: &str, keywords: &[&str]) -> Option<String> {
    let sentence = body_text
        .split('.')
        .map(str::trim)
        .find(|sentence| sentence.chars().count() >= MIN_SENTENCE_CHARS)?;

    let lower_sentence = sentence.to_lowercase();
    let missing: Vec<&str> = keywords
        .iter()
        .take(DESCRIPTION_KEYWORDS)
        .filter(|keyword| !lower_sentence.contains(*keyword))
        .copied()
        .collect();

    let mut description = format!("{}.", sentence);
    if !missing.is_empty() {
        description.push(' ');
        description.push_str(&missing.join(", "));
    }

    Some(truncate_chars(&description, MAX_DESCRIPTION_CHARS))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
