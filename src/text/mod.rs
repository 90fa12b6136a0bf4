//! Text segmentation: words, sentences, paragraphs and syllables.
//!
//! [`TextMetrics::compute`] runs every segmenter once and is the input to
//! the stats, readability and suggestion engines.
//!
//! # Module Structure
//!
//! - [`words`] - word and paragraph extraction
//! - [`sentences`] - sentence boundary detection
//! - [`syllables`] - per-language syllable estimation
//! - [`frequency`] - word counts, stop words and repetitions

pub mod frequency;
pub mod sentences;
pub mod syllables;
pub mod words;

use serde::Serialize;
use std::collections::HashMap;

use crate::language::Language;

pub use frequency::{find_repetitions, word_frequency, Repetition};
pub use sentences::{RuleBasedSplitter, SentenceSplitter};
pub use syllables::{count_syllables, DictionaryHyphenator, HyphenationError, Hyphenator};
pub use words::{extract_paragraphs, extract_words};

/// Segmentation result for one text snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMetrics {
    pub words: Vec<String>,
    pub sentences: Vec<String>,
    pub paragraphs: Vec<String>,
    /// Unicode scalar values, whitespace included.
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub syllables: usize,
    /// Lowercased word counts. Iteration order carries no meaning.
    #[serde(skip)]
    pub word_frequency: HashMap<String, usize>,
    pub repetitions: Vec<Repetition>,
}

impl TextMetrics {
    pub fn compute(
        text: &str,
        language: Language,
        splitter: &dyn SentenceSplitter,
        hyphenator: &dyn Hyphenator,
    ) -> Self {
        let words = extract_words(text);
        let sentences = splitter.split(text).into_iter().map(str::to_string).collect();
        let paragraphs = extract_paragraphs(text);
        let syllables = count_syllables(&words, language, hyphenator);
        let word_frequency = word_frequency(&words);
        let repetitions = find_repetitions(&words, &word_frequency, language);

        Self {
            characters: text.chars().count(),
            characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
            words,
            sentences,
            paragraphs,
            syllables,
            word_frequency,
            repetitions,
        }
    }

    /// Metrics with the default splitter and hyphenator for `language`.
    pub fn with_defaults(text: &str, language: Language) -> Self {
        Self::compute(
            text,
            language,
            &RuleBasedSplitter::new(language),
            &DictionaryHyphenator,
        )
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Alphabetic characters across all words.
    pub fn letter_count(&self) -> usize {
        self.words
            .iter()
            .flat_map(|w| w.chars())
            .filter(|c| c.is_alphabetic())
            .count()
    }
}
