//! Syllable estimation.
//!
//! English words go through a [`Hyphenator`] (Knuth-Liang patterns by
//! default) and fall back to a vowel-cluster heuristic when the dictionary
//! cannot handle a word. Portuguese uses vowel counting with diphthong and
//! silent-u corrections.

use hyphenation::{Hyphenator as _, Load, Standard};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::language::{Language, RuleSet};

/// Failure to hyphenate a single word.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HyphenationError {
    #[error("hyphenation dictionary is unavailable")]
    DictionaryUnavailable,
    #[error("word '{0}' is not covered by the dictionary")]
    UnsupportedWord(String),
}

/// Breaks a word into hyphenation segments joined by `-`.
pub trait Hyphenator: Send + Sync {
    fn hyphenate(&self, word: &str) -> Result<String, HyphenationError>;
}

static EN_US: Lazy<Option<Standard>> = Lazy::new(|| {
    match Standard::from_embedded(hyphenation::Language::EnglishUS) {
        Ok(dictionary) => Some(dictionary),
        Err(e) => {
            warn!(error = %e, "Failed to load en-US hyphenation patterns");
            None
        }
    }
});

/// English hyphenator backed by the embedded en-US pattern dictionary.
#[derive(Debug, Default, Clone, Copy)]
pub struct DictionaryHyphenator;

impl Hyphenator for DictionaryHyphenator {
    fn hyphenate(&self, word: &str) -> Result<String, HyphenationError> {
        let dictionary = EN_US
            .as_ref()
            .ok_or(HyphenationError::DictionaryUnavailable)?;
        let lower = word.to_lowercase();
        if lower.is_empty() || !lower.chars().all(|c| c.is_ascii_lowercase() || c == '\'') {
            return Err(HyphenationError::UnsupportedWord(word.to_string()));
        }

        let hyphenated = dictionary.hyphenate(&lower);
        let mut marked = String::with_capacity(lower.len() + hyphenated.breaks.len());
        let mut last = 0;
        for &at in &hyphenated.breaks {
            marked.push_str(&lower[last..at]);
            marked.push('-');
            last = at;
        }
        marked.push_str(&lower[last..]);
        Ok(marked)
    }
}

static SILENT_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").expect("suffix regex"));
static LEADING_Y_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^y").expect("leading y regex"));
static VOWEL_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiouy]{1,2}").expect("vowel group regex"));

static PT_VOWEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiouyáéíóúâêôãõà]").expect("pt vowel regex"));
static PT_DIPHTHONG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ai|au|ei|eu|oi|ou|ui|iu|ia|ie|io|ua|ue|uo|ão|õe").expect("pt diphthong regex")
});
static PT_SILENT_U_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"qu[ei]|gu[ei]").expect("pt silent u regex"));

/// Vowel-cluster estimate for English words.
///
/// Also used by the readability formulas, independently of the
/// language-specific counter.
pub fn english_heuristic(word: &str) -> usize {
    let lower = word.to_lowercase();
    if lower.chars().count() <= 3 {
        return 1;
    }
    let stripped = SILENT_SUFFIX_RE.replace(&lower, "");
    let stripped = LEADING_Y_RE.replace(&stripped, "");
    VOWEL_GROUP_RE.find_iter(&stripped).count().max(1)
}

/// Vowels minus diphthongs minus silent-u patterns, floored at 1.
pub fn portuguese_syllables(word: &str) -> usize {
    let lower = word.to_lowercase();
    if lower.chars().count() <= 3 {
        return 1;
    }
    let vowels = PT_VOWEL_RE.find_iter(&lower).count();
    let diphthongs = PT_DIPHTHONG_RE.find_iter(&lower).count();
    let silent = PT_SILENT_U_RE.find_iter(&lower).count();
    vowels.saturating_sub(diphthongs + silent).max(1)
}

/// Syllables of one English word, via the hyphenator when it succeeds.
pub fn english_syllables(word: &str, hyphenator: &dyn Hyphenator) -> usize {
    if word.chars().count() <= 3 {
        return 1;
    }
    match hyphenator.hyphenate(word) {
        Ok(marked) => marked.split('-').filter(|s| !s.is_empty()).count().max(1),
        Err(_) => english_heuristic(word),
    }
}

/// Total syllables across `words` using the rules for `language`.
pub fn count_syllables<S: AsRef<str>>(
    words: &[S],
    language: Language,
    hyphenator: &dyn Hyphenator,
) -> usize {
    match language.rules() {
        RuleSet::English => words
            .iter()
            .map(|w| english_syllables(w.as_ref(), hyphenator))
            .sum(),
        RuleSet::Portuguese => words.iter().map(|w| portuguese_syllables(w.as_ref())).sum(),
    }
}
