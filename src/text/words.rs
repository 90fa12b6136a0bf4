//! Word and paragraph extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Word characters plus Latin-1 letters, apostrophes and hyphens.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w\x{C0}-\x{FF}'-]+").expect("word regex"));

/// One or more blank lines.
static PARAGRAPH_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph regex"));

/// Extract word tokens in document order.
pub fn extract_words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Split on blank lines, trimming each block and dropping empty ones.
pub fn extract_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
