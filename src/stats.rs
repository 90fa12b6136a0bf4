//! Document statistics derived from [`TextMetrics`].

use serde::Serialize;

use crate::text::frequency::first_seen_order;
use crate::text::TextMetrics;

/// Default reading speed in words per minute.
pub const DEFAULT_READING_SPEED: u32 = 200;

const TOP_WORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub character_count: usize,
    pub character_count_no_spaces: usize,
    pub syllable_count: usize,
    pub average_word_length: f64,
    pub average_sentence_length: f64,
    pub average_syllables_per_word: f64,
    pub reading_time_minutes: f64,
    pub top_words: Vec<WordCount>,
}

impl TextStats {
    /// Derive stats at `reading_speed` words per minute (0 is treated as the default).
    pub fn from_metrics(metrics: &TextMetrics, reading_speed: u32) -> Self {
        let words = metrics.word_count();
        let speed = if reading_speed == 0 {
            DEFAULT_READING_SPEED
        } else {
            reading_speed
        };

        let letters_in_words: usize = metrics.words.iter().map(|w| w.chars().count()).sum();

        Self {
            word_count: words,
            sentence_count: metrics.sentence_count(),
            paragraph_count: metrics.paragraphs.len(),
            character_count: metrics.characters,
            character_count_no_spaces: metrics.characters_no_spaces,
            syllable_count: metrics.syllables,
            average_word_length: ratio(letters_in_words, words),
            average_sentence_length: ratio(words, metrics.sentence_count()),
            average_syllables_per_word: ratio(metrics.syllables, words),
            reading_time_minutes: words as f64 / f64::from(speed),
            top_words: top_words(metrics, TOP_WORDS),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Most frequent words, ties broken by first appearance.
fn top_words(metrics: &TextMetrics, limit: usize) -> Vec<WordCount> {
    let mut counted: Vec<WordCount> = first_seen_order(&metrics.words)
        .into_iter()
        .map(|word| {
            let count = metrics.word_frequency.get(&word).copied().unwrap_or(0);
            WordCount { word, count }
        })
        .collect();
    counted.sort_by(|a, b| b.count.cmp(&a.count));
    counted.truncate(limit);
    counted
}

/// "N sec" below one minute, otherwise whole minutes rounded up.
pub fn format_reading_time(minutes: f64) -> String {
    if minutes < 1.0 {
        format!("{} sec", (minutes * 60.0).round() as u64)
    } else {
        format!("{} min", minutes.ceil() as u64)
    }
}
