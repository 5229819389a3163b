//! Body keyword frequency table
//!
//! Raw token counting only: no stemming, no language detection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tokens ignored when counting keywords
///
/// Only words longer than three characters are listed; shorter tokens are
/// filtered by length anyway.
pub const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "because", "been", "before", "being",
    "below", "between", "both", "cannot", "could", "does", "doing", "down", "during", "each",
    "from", "further", "have", "having", "here", "into", "just", "more", "most", "much", "must",
    "once", "only", "other", "ours", "over", "same", "should", "some", "such", "than", "that",
    "their", "theirs", "them", "then", "there", "these", "they", "this", "those", "through",
    "under", "until", "very", "were", "what", "when", "where", "which", "while", "will", "with",
    "would", "your", "yours",
];

/// A keyword with its share of all body tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    pub keyword: String,
    pub count: usize,
    /// Percentage of all whitespace-separated body tokens, two decimals
    pub density: f64,
}

/// Word counts in first-seen order
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    total_tokens: usize,
}

impl KeywordTable {
    /// Builds the table from body text
    ///
    /// Tokens are split on whitespace, lower-cased and stripped of leading
    /// and trailing punctuation. Tokens of three characters or fewer and stop
    /// words are not counted, but every whitespace token counts toward the
    /// density denominator.
    pub fn from_text(text: &str) -> Self {
        let mut table = Self::default();

        for raw in text.split_whitespace() {
            table.total_tokens += 1;

            let token = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();

            if token.chars().count() <= 3 || STOP_WORDS.contains(&token.as_str()) {
                continue;
            }

            table.record(token);
        }

        table
    }

    fn record(&mut self, token: String) {
        match self.index.get(&token) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(token.clone(), self.entries.len());
                self.entries.push((token, 1));
            }
        }
    }

    /// Count for `word` (expects a lower-cased word)
    pub fn count(&self, word: &str) -> usize {
        self.index
            .get(word)
            .map(|&position| self.entries[position].1)
            .unwrap_or(0)
    }

    /// Number of distinct keywords
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All whitespace-separated tokens seen, including filtered ones
    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    /// Iterates keywords in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// The `n` most frequent keywords, ties broken by first-seen order
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.iter().collect();
        // sort_by is stable, so equal counts keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Top `n` keywords with their density
    pub fn density(&self, n: usize) -> Vec<KeywordDensity> {
        let total = self.total_tokens.max(1) as f64;
        self.top(n)
            .into_iter()
            .map(|(keyword, count)| KeywordDensity {
                keyword: keyword.to_string(),
                count,
                density: (count as f64 / total * 10_000.0).round() / 100.0,
            })
            .collect()
    }
}
