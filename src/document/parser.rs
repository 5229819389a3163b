//! HTML parser producing a [`ParsedDocument`]
//!
//! This module handles parsing page markup to extract:
//! - Title, meta description/keywords, canonical link and language
//! - Headings, images and anchors in document order, with their issues
//! - Visible body text and its keyword table
//! - Embedded JSON-LD blocks

use crate::document::{
    Anchor, Heading, ImageInfo, InternalLink, KeywordTable, ParsedDocument, ALT_TOO_LONG,
    EMPTY_HEADING, HEADING_TOO_LONG, INVALID_JSON_LD, LEGACY_IMAGE_FORMAT, MAX_ALT_CHARS,
    MAX_HEADING_CHARS, MISSING_ALT, MULTIPLE_H1, UNPARSEABLE_DOCUMENT,
};
use crate::url::is_same_host;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Elements whose text never counts as visible body text
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses raw HTML into a [`ParsedDocument`]
///
/// Relative `href`/`src` attributes are resolved against `base_url`. Parsing
/// never fails: input without usable markup yields an empty document that
/// carries an [`UNPARSEABLE_DOCUMENT`] warning.
///
/// # Example
///
/// ```
/// use seo_audit::document::parse_document;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><h1>Hi</h1><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let doc = parse_document(html, &base_url);
/// assert_eq!(doc.title, "Test");
/// assert_eq!(doc.internal_links[0].href, "https://example.com/page");
/// ```
pub fn parse_document(html: &str, base_url: &Url) -> ParsedDocument {
    let mut parsed = ParsedDocument::empty(base_url.as_str());

    if html.trim().is_empty() {
        parsed.warnings.push(UNPARSEABLE_DOCUMENT.to_string());
        return parsed;
    }

    let document = Html::parse_document(html);

    if !has_content(&document) {
        parsed.warnings.push(UNPARSEABLE_DOCUMENT.to_string());
        return parsed;
    }

    parsed.title = extract_title(&document);
    parsed.meta_description = extract_meta(&document, "description");
    parsed.meta_keywords = extract_meta(&document, "keywords");
    parsed.canonical = extract_canonical(&document, base_url);
    parsed.lang = extract_lang(&document);
    parsed.headings = extract_headings(&document);
    parsed.images = extract_images(&document, base_url);
    parsed.links = extract_anchors(&document, base_url);
    parsed.internal_links = parsed
        .links
        .iter()
        .filter(|anchor| anchor.internal)
        .map(|anchor| InternalLink {
            href: anchor.href.clone(),
            anchor_text: anchor.text.clone(),
            quality_score: link_quality(&anchor.text),
        })
        .collect();
    parsed.body_text = extract_body_text(&document);
    parsed.body_word_frequency = KeywordTable::from_text(&parsed.body_text);

    let (structured_data, invalid_blocks) = extract_json_ld(&document);
    parsed.structured_data = structured_data;
    parsed
        .warnings
        .extend(std::iter::repeat(INVALID_JSON_LD.to_string()).take(invalid_blocks));

    parsed
}

/// Returns true if the parsed tree holds any element or text beyond the
/// implied `html`/`head`/`body` skeleton
fn has_content(document: &Html) -> bool {
    document.root_element().descendants().any(|node| match node.value() {
        Node::Element(element) => !matches!(element.name(), "html" | "head" | "body"),
        Node::Text(text) => !text.trim().is_empty(),
        _ => false,
    })
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Joins an element's text nodes and collapses whitespace
fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Some(title_selector) = selector("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element_text(&element))
        .unwrap_or_default()
}

/// Extracts `<meta name="...">` content, matching the name case-insensitively
fn extract_meta(document: &Html, name: &str) -> String {
    let Some(meta_selector) = selector("meta[name][content]") else {
        return String::new();
    };

    document
        .select(&meta_selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn extract_canonical(document: &Html, base_url: &Url) -> Option<String> {
    let canonical_selector = selector("link[rel='canonical'][href]")?;
    document
        .select(&canonical_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| base_url.join(href.trim()).ok())
        .map(|url| url.to_string())
}

fn extract_lang(document: &Html) -> Option<String> {
    document
        .root_element()
        .value()
        .attr("lang")
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
}

/// Walks `h1`..`h6` in document order
fn extract_headings(document: &Html) -> Vec<Heading> {
    let Some(heading_selector) = selector("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    let mut seen_h1 = false;
    let mut headings = Vec::new();

    for element in document.select(&heading_selector) {
        let level = element
            .value()
            .name()
            .trim_start_matches('h')
            .parse::<u8>()
            .unwrap_or(6);
        let text = element_text(&element);
        let mut issues = BTreeSet::new();

        if text.is_empty() {
            issues.insert(EMPTY_HEADING.to_string());
        }
        if text.chars().count() > MAX_HEADING_CHARS {
            issues.insert(HEADING_TOO_LONG.to_string());
        }
        if level == 1 {
            if seen_h1 {
                issues.insert(MULTIPLE_H1.to_string());
            }
            seen_h1 = true;
        }

        headings.push(Heading {
            level,
            text,
            issues,
        });
    }

    headings
}

fn extract_images(document: &Html, base_url: &Url) -> Vec<ImageInfo> {
    let Some(img_selector) = selector("img") else {
        return Vec::new();
    };

    document
        .select(&img_selector)
        .map(|element| {
            let raw_src = element.value().attr("src").unwrap_or("").trim();
            let src = if raw_src.is_empty() {
                String::new()
            } else {
                base_url
                    .join(raw_src)
                    .map(|url| url.to_string())
                    .unwrap_or_else(|_| raw_src.to_string())
            };
            let alt = element.value().attr("alt").unwrap_or("").trim().to_string();

            let mut issues = BTreeSet::new();
            if alt.is_empty() {
                issues.insert(MISSING_ALT.to_string());
            }
            if alt.chars().count() > MAX_ALT_CHARS {
                issues.insert(ALT_TOO_LONG.to_string());
            }
            let lower_src = src.to_lowercase();
            if !lower_src.contains("webp") && !lower_src.contains("avif") {
                issues.insert(LEGACY_IMAGE_FORMAT.to_string());
            }

            ImageInfo { src, alt, issues }
        })
        .collect()
}

/// Extracts every followable anchor
///
/// An anchor is internal when its raw href is root-relative (`/path`, not
/// `//host`) or its resolved URL has the page's host, so bare relative hrefs
/// such as `relative` count as internal. A different host that merely
/// contains the page's hostname does not.
///
/// **Excluded:** `javascript:`, `mailto:`, `tel:` and `data:` links,
/// fragment-only links, and anchors carrying the `download` attribute.
fn extract_anchors(document: &Html, base_url: &Url) -> Vec<Anchor> {
    let Some(a_selector) = selector("a[href]") else {
        return Vec::new();
    };
    let mut anchors = Vec::new();
    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(raw_href) = element.value().attr("href").map(str::trim) else {
            continue;
        };
        let Some(resolved) = resolve_link(raw_href, base_url) else {
            continue;
        };

        let root_relative = raw_href.starts_with('/') && !raw_href.starts_with("//");
        let same_host = is_same_host(&resolved, base_url);
        let nofollow = element
            .value()
            .attr("rel")
            .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("nofollow")));

        anchors.push(Anchor {
            href: resolved.to_string(),
            text: element_text(&element),
            internal: root_relative || same_host,
            nofollow,
        });
    }

    anchors
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    base_url
        .join(href)
        .ok()
        .filter(|url| url.scheme() == "http" || url.scheme() == "https")
}

/// Scores anchor text quality, 0-100
///
/// Starts at 100: empty text costs 30, text shorter than three characters a
/// further 20, and "click here" 40. Never below 0.
pub(crate) fn link_quality(anchor_text: &str) -> u8 {
    let text = anchor_text.trim();
    let mut score: i32 = 100;

    if text.is_empty() {
        score -= 30;
    }
    if text.chars().count() < 3 {
        score -= 20;
    }
    if text.eq_ignore_ascii_case("click here") {
        score -= 40;
    }

    score.clamp(0, 100) as u8
}

/// Collects visible text from `<body>`, skipping script-like elements
fn extract_body_text(document: &Html) -> String {
    let root = selector("body")
        .and_then(|body_selector| document.select(&body_selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|element| HIDDEN_TEXT_ELEMENTS.contains(&element.name()));
        if !hidden {
            parts.push(text);
        }
    }

    collapse_whitespace(&parts.join(" "))
}

/// Parses `application/ld+json` blocks; returns the values and the number of
/// blocks that were not valid JSON
fn extract_json_ld(document: &Html) -> (Vec<serde_json::Value>, usize) {
    let Some(script_selector) = selector("script[type='application/ld+json']") else {
        return (Vec::new(), 0);
    };

    let mut values = Vec::new();
    let mut invalid = 0;

    for element in document.select(&script_selector) {
        let raw = element.text().collect::<String>();
        match serde_json::from_str::<serde_json::Value>(raw.trim()) {
            Ok(serde_json::Value::Array(items)) => values.extend(items),
            Ok(value) => values.push(value),
            Err(e) => {
                tracing::debug!("Skipping invalid JSON-LD block: {}", e);
                invalid += 1;
            }
        }
    }

    (values, invalid)
}
