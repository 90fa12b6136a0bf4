//! Readability formulas over segmented text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language::{Language, RuleSet};
use crate::text::syllables::english_heuristic;
use crate::text::TextMetrics;

/// Seven-way bucket of the Flesch Reading Ease score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadabilityLevel {
    VeryEasy,
    Easy,
    FairlyEasy,
    Standard,
    FairlyDifficult,
    Difficult,
    VeryDifficult,
}

impl ReadabilityLevel {
    pub fn from_flesch(score: f64) -> Self {
        match score {
            s if s >= 90.0 => ReadabilityLevel::VeryEasy,
            s if s >= 80.0 => ReadabilityLevel::Easy,
            s if s >= 70.0 => ReadabilityLevel::FairlyEasy,
            s if s >= 60.0 => ReadabilityLevel::Standard,
            s if s >= 50.0 => ReadabilityLevel::FairlyDifficult,
            s if s >= 30.0 => ReadabilityLevel::Difficult,
            _ => ReadabilityLevel::VeryDifficult,
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            ReadabilityLevel::VeryEasy => {
                "Very easy to read. Easily understood by an average 11-year-old student."
            }
            ReadabilityLevel::Easy => "Easy to read. Conversational English for consumers.",
            ReadabilityLevel::FairlyEasy => "Fairly easy to read.",
            ReadabilityLevel::Standard => {
                "Standard readability. Understood by 13- to 15-year-old students."
            }
            ReadabilityLevel::FairlyDifficult => "Fairly difficult to read.",
            ReadabilityLevel::Difficult => {
                "Difficult to read. Best understood by college graduates."
            }
            ReadabilityLevel::VeryDifficult => {
                "Very difficult to read. Best understood by university graduates."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadabilityLevel::VeryEasy => "very-easy",
            ReadabilityLevel::Easy => "easy",
            ReadabilityLevel::FairlyEasy => "fairly-easy",
            ReadabilityLevel::Standard => "standard",
            ReadabilityLevel::FairlyDifficult => "fairly-difficult",
            ReadabilityLevel::Difficult => "difficult",
            ReadabilityLevel::VeryDifficult => "very-difficult",
        }
    }
}

impl fmt::Display for ReadabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const EMPTY_INTERPRETATION: &str = "No text to analyze.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadabilityScores {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub gunning_fog: f64,
    pub coleman_liau: f64,
    pub automated_readability: f64,
    pub dale_chall: f64,
    pub overall_level: ReadabilityLevel,
    pub interpretation: String,
}

impl ReadabilityScores {
    /// Neutral result for text without words or sentences.
    pub fn empty() -> Self {
        Self {
            flesch_reading_ease: 0.0,
            flesch_kincaid_grade: 0.0,
            gunning_fog: 0.0,
            coleman_liau: 0.0,
            automated_readability: 0.0,
            dale_chall: 0.0,
            overall_level: ReadabilityLevel::Standard,
            interpretation: EMPTY_INTERPRETATION.to_string(),
        }
    }
}

/// Words of at least this many syllables are "complex" for Gunning Fog.
const COMPLEX_SYLLABLES: usize = 3;
/// Words longer than this are "difficult" for Dale-Chall.
const DIFFICULT_WORD_LENGTH: usize = 6;

pub struct ReadabilityEngine;

impl ReadabilityEngine {
    pub fn calculate(metrics: &TextMetrics, language: Language) -> ReadabilityScores {
        let words = metrics.word_count();
        let sentences = metrics.sentence_count();
        if words == 0 || sentences == 0 {
            return ReadabilityScores::empty();
        }

        let w = words as f64;
        let s = sentences as f64;
        let words_per_sentence = w / s;
        let syllables_per_word = metrics.syllables as f64 / w;

        let base = match language.rules() {
            RuleSet::Portuguese => 248.835,
            RuleSet::English => 206.835,
        };
        let flesch = base - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
        let kincaid = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;

        let estimates: Vec<(usize, usize)> = metrics
            .words
            .iter()
            .map(|word| (word.chars().count(), english_heuristic(word)))
            .collect();
        let complex = estimates
            .iter()
            .filter(|(_, syl)| *syl >= COMPLEX_SYLLABLES)
            .count() as f64;
        let difficult = estimates
            .iter()
            .filter(|(len, syl)| *len > DIFFICULT_WORD_LENGTH || *syl >= COMPLEX_SYLLABLES)
            .count() as f64;

        let fog = 0.4 * (words_per_sentence + 100.0 * (complex / w));

        let letters_per_100 = metrics.letter_count() as f64 / w * 100.0;
        let sentences_per_100 = s / w * 100.0;
        let coleman_liau = 0.0588 * letters_per_100 - 0.296 * sentences_per_100 - 15.8;

        let ari = 4.71 * (metrics.characters as f64 / w) + 0.5 * words_per_sentence - 21.43;

        let dale_chall = 0.1579 * (difficult / w * 100.0) + 0.0496 * words_per_sentence;

        let overall_level = ReadabilityLevel::from_flesch(flesch);
        ReadabilityScores {
            flesch_reading_ease: round1(flesch),
            flesch_kincaid_grade: round1(kincaid),
            gunning_fog: round1(fog),
            coleman_liau: round1(coleman_liau),
            automated_readability: round1(ari),
            dale_chall: round1(dale_chall),
            overall_level,
            interpretation: overall_level.interpretation().to_string(),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
