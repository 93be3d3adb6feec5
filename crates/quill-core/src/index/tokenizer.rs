//! Document and query tokenizer
//!
//! Shared by indexing and scoring so term frequencies line up. Intentionally
//! simple and deterministic: lowercase ASCII alphanumeric runs minus a small
//! stop-word list.

use regex::Regex;
use std::sync::LazyLock;

/// High-frequency function words dropped from documents and queries
const STOP_WORDS: [&str; 15] = [
    "the", "and", "a", "to", "of", "in", "it", "is", "that", "on", "for", "as", "with", "this",
    "be",
];

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("hardcoded pattern is valid"));

/// Tokenize text for indexing or querying
pub fn tokenize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|token| !STOP_WORDS.contains(&token.as_str()))
        .collect()
}
