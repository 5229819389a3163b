//! Parsed page model
//!
//! A [`ParsedDocument`] is the immutable snapshot of one fetched page that
//! every later stage (scoring, link scanning, schema generation) reads from.
//!
//! - `parser` turns raw HTML into a `ParsedDocument`
//! - `keywords` builds the body word-frequency table
//! - `analyzer` derives structural findings from a parsed document

mod analyzer;
mod keywords;
mod parser;

pub use analyzer::{analyze_content, ContentSummary, LevelGap};
pub use keywords::{KeywordDensity, KeywordTable, STOP_WORDS};
pub use parser::parse_document;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Heading issue: text is empty after trimming
pub const EMPTY_HEADING: &str = "Empty heading";
/// Heading issue: text longer than [`MAX_HEADING_CHARS`]
pub const HEADING_TOO_LONG: &str = "Heading too long";
/// Heading issue: recorded on every H1 after the first
pub const MULTIPLE_H1: &str = "Multiple H1 tags found";
/// Image issue: `alt` empty or absent
pub const MISSING_ALT: &str = "Missing alt text";
/// Image issue: `alt` longer than [`MAX_ALT_CHARS`]
pub const ALT_TOO_LONG: &str = "Alt text too long";
/// Image issue: `src` is neither WebP nor AVIF
pub const LEGACY_IMAGE_FORMAT: &str = "Consider modern image formats";

/// Parser warning for input that yields no usable markup
pub const UNPARSEABLE_DOCUMENT: &str = "Document could not be parsed";
/// Parser warning for an `application/ld+json` block that is not valid JSON
pub const INVALID_JSON_LD: &str = "Invalid JSON-LD block";

pub const MAX_HEADING_CHARS: usize = 60;
pub const MAX_ALT_CHARS: usize = 125;

/// One `<h1>`..`<h6>` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    pub text: String,
    pub issues: BTreeSet<String>,
}

/// One `<img>` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Absolute image URL (empty when the tag has no `src`)
    pub src: String,
    pub alt: String,
    pub issues: BTreeSet<String>,
}

/// An anchor pointing back into the same site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalLink {
    /// Absolute URL
    pub href: String,
    pub anchor_text: String,
    /// 0-100, see the parser's quality rules
    pub quality_score: u8,
}

/// Any followable anchor on the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    /// Absolute URL
    pub href: String,
    pub text: String,
    pub internal: bool,
    pub nofollow: bool,
}

/// Immutable snapshot of one fetched page
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Absolute URL the document was fetched from
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub canonical: Option<String>,
    pub lang: Option<String>,
    /// Headings in document order
    pub headings: Vec<Heading>,
    /// Images in document order
    pub images: Vec<ImageInfo>,
    /// Internal links in document order
    pub internal_links: Vec<InternalLink>,
    /// Every followable anchor in document order
    pub links: Vec<Anchor>,
    /// Visible body text, whitespace collapsed
    pub body_text: String,
    pub body_word_frequency: KeywordTable,
    /// Embedded JSON-LD blocks
    pub structured_data: Vec<serde_json::Value>,
    /// Parse-level problems; the document is still usable
    pub warnings: Vec<String>,
}

impl ParsedDocument {
    /// Creates an empty document for `url`
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            meta_description: String::new(),
            meta_keywords: String::new(),
            canonical: None,
            lang: None,
            headings: Vec::new(),
            images: Vec::new(),
            internal_links: Vec::new(),
            links: Vec::new(),
            body_text: String::new(),
            body_word_frequency: KeywordTable::default(),
            structured_data: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Number of H1 headings
    pub fn h1_count(&self) -> usize {
        self.headings.iter().filter(|h| h.level == 1).count()
    }
}
