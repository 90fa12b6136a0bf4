//! Rule-based writing suggestions.
//!
//! [`SuggestionEngine`] runs the detectors in a fixed order (repetitions,
//! passive voice, clichés, long sentences, complex words, grammar) and
//! summarizes the result. Positions are character offsets into the analyzed
//! text and are only valid for that exact snapshot.
//!
//! # Module Structure
//!
//! - [`patterns`] - per-language regex and phrase tables
//! - [`detectors`] - one function per suggestion kind
//! - [`style`] - the pluggable grammar/style checker

pub mod detectors;
pub mod patterns;
pub mod style;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::language::Language;
use crate::text::{Repetition, TextMetrics};
use patterns::PatternSet;

pub use style::{StyleCheckError, StyleChecker, StyleIssue, WordinessChecker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    Repetition,
    Passive,
    Cliche,
    LongSentence,
    ComplexWord,
    Grammar,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Repetition => "repetition",
            SuggestionKind::Passive => "passive",
            SuggestionKind::Cliche => "cliche",
            SuggestionKind::LongSentence => "long-sentence",
            SuggestionKind::ComplexWord => "complex-word",
            SuggestionKind::Grammar => "grammar",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        })
    }
}

/// Character span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

impl Position {
    /// Sentinel for suggestions that do not point at a single span.
    pub const NONE: Position = Position { start: 0, end: 0 };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub severity: Severity,
    pub message: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Repetition>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionSummary {
    pub total: usize,
    pub by_type: BTreeMap<SuggestionKind, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}

impl SuggestionSummary {
    pub fn from_suggestions(suggestions: &[Suggestion]) -> Self {
        let mut summary = SuggestionSummary {
            total: suggestions.len(),
            ..Default::default()
        };
        for s in suggestions {
            *summary.by_type.entry(s.kind).or_insert(0) += 1;
            *summary.by_severity.entry(s.severity).or_insert(0) += 1;
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionReport {
    pub suggestions: Vec<Suggestion>,
    pub summary: SuggestionSummary,
}

/// Detector thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSettings {
    /// Sentences with more words than this are flagged.
    pub long_sentence_words: usize,
    /// Above this many words a long sentence is high severity.
    pub very_long_sentence_words: usize,
    /// Words with more characters than this are flagged.
    pub complex_word_length: usize,
    /// More distinct repeated words than this makes the group high severity.
    pub repetition_high_threshold: usize,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            long_sentence_words: 25,
            very_long_sentence_words: 40,
            complex_word_length: 15,
            repetition_high_threshold: 5,
        }
    }
}

/// Maps byte offsets to character offsets.
pub struct CharOffsets {
    boundaries: Vec<usize>,
}

impl CharOffsets {
    pub fn new(text: &str) -> Self {
        Self {
            boundaries: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    pub fn char_offset(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(index) | Err(index) => index,
        }
    }

    pub fn position(&self, start: usize, end: usize) -> Position {
        Position {
            start: self.char_offset(start),
            end: self.char_offset(end),
        }
    }
}

pub struct SuggestionEngine {
    settings: SuggestionSettings,
    patterns: PatternSet,
    style_checker: Option<Arc<dyn StyleChecker>>,
}

impl SuggestionEngine {
    pub fn new(language: Language, settings: SuggestionSettings) -> Self {
        Self {
            settings,
            patterns: PatternSet::for_language(language),
            style_checker: None,
        }
    }

    pub fn with_style_checker(mut self, checker: Arc<dyn StyleChecker>) -> Self {
        self.style_checker = Some(checker);
        self
    }

    pub fn analyze(&self, text: &str, metrics: &TextMetrics) -> SuggestionReport {
        let offsets = CharOffsets::new(text);
        let mut suggestions = Vec::new();

        suggestions.extend(detectors::repetitions(&metrics.repetitions, &self.settings));
        suggestions.extend(detectors::passive_voice(text, &offsets, &self.patterns));
        suggestions.extend(detectors::cliches(text, &offsets, &self.patterns));
        suggestions.extend(detectors::long_sentences(
            text,
            &offsets,
            metrics,
            &self.settings,
        ));
        suggestions.extend(detectors::complex_words(
            text,
            &offsets,
            metrics,
            &self.settings,
        ));

        if let Some(checker) = &self.style_checker {
            match checker.check(text) {
                Ok(issues) => suggestions.extend(detectors::grammar(text, &offsets, issues)),
                Err(e) => warn!(error = %e, "Style check failed, skipping grammar suggestions"),
            }
        }

        let summary = SuggestionSummary::from_suggestions(&suggestions);
        SuggestionReport {
            suggestions,
            summary,
        }
    }
}
