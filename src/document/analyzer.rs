use crate::document::{KeywordDensity, ParsedDocument, LEGACY_IMAGE_FORMAT, MISSING_ALT};
use serde::{Deserialize, Serialize};

/// Internal links scoring below this are reported as weak
pub const WEAK_LINK_THRESHOLD: u8 = 70;

/// Number of keywords in the density report
pub const DENSITY_TOP_N: usize = 10;

/// A jump of more than one heading level, e.g. H2 followed by H4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGap {
    pub from: u8,
    pub to: u8,
}

/// Structural findings derived from a parsed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub h1_count: usize,
    pub level_gaps: Vec<LevelGap>,
    pub images_total: usize,
    pub images_missing_alt: usize,
    pub images_legacy_format: usize,
    pub weak_internal_links: usize,
    pub keyword_density: Vec<KeywordDensity>,
}

/// Derives heading, image, link and keyword findings from `doc`
pub fn analyze_content(doc: &ParsedDocument) -> ContentSummary {
    let mut level_gaps = Vec::new();
    for pair in doc.headings.windows(2) {
        let (previous, next) = (pair[0].level, pair[1].level);
        if next > previous + 1 {
            level_gaps.push(LevelGap {
                from: previous,
                to: next,
            });
        }
    }

    let count_images = |issue: &str| doc.images.iter().filter(|i| i.issues.contains(issue)).count();

    ContentSummary {
        h1_count: doc.h1_count(),
        level_gaps,
        images_total: doc.images.len(),
        images_missing_alt: count_images(MISSING_ALT),
        images_legacy_format: count_images(LEGACY_IMAGE_FORMAT),
        weak_internal_links: doc
            .internal_links
            .iter()
            .filter(|link| link.quality_score < WEAK_LINK_THRESHOLD)
            .count(),
        keyword_density: doc.body_word_frequency.density(DENSITY_TOP_N),
    }
}
