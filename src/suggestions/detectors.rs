//! Rule-based detectors. Each returns suggestions in document order for
//! its own kind; the engine concatenates them.

use std::collections::HashSet;

use super::patterns::PatternSet;
use super::style::StyleIssue;
use super::{CharOffsets, Position, Severity, Suggestion, SuggestionKind, SuggestionSettings};
use crate::text::{Repetition, TextMetrics};

/// Length in bytes of the first char of `s`, or 1 for an empty string.
fn first_char_len(s: &str) -> usize {
    s.chars().next().map_or(1, char::len_utf8)
}

/// One grouped suggestion listing every repeated word, positioned at `{0, 0}`.
pub fn repetitions(repetitions: &[Repetition], settings: &SuggestionSettings) -> Option<Suggestion> {
    if repetitions.is_empty() {
        return None;
    }
    let total = repetitions.len();
    let severity = if total > settings.repetition_high_threshold {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Suggestion {
        id: "repetitions-group".to_string(),
        kind: SuggestionKind::Repetition,
        severity,
        message: format!("{} words frequently repeated", total),
        position: Position::NONE,
        explanation: Some("Varying vocabulary keeps the reader engaged.".to_string()),
        details: Some(repetitions.to_vec()),
    })
}

pub fn passive_voice(text: &str, offsets: &CharOffsets, patterns: &PatternSet) -> Vec<Suggestion> {
    let mut results = Vec::new();
    for pattern in patterns.passive {
        for m in pattern.find_iter(text) {
            let position = offsets.position(m.start(), m.end());
            results.push(Suggestion {
                id: format!("passive-{}", position.start),
                kind: SuggestionKind::Passive,
                severity: Severity::Low,
                message: format!("Passive voice: \"{}\"", m.as_str()),
                position,
                explanation: Some("Active voice is usually stronger and more direct.".to_string()),
                details: None,
            });
        }
    }
    results
}

/// Every occurrence of every cliché. The next search starts one character
/// after the previous match, so overlapping occurrences are reported too.
pub fn cliches(text: &str, offsets: &CharOffsets, patterns: &PatternSet) -> Vec<Suggestion> {
    let mut results = Vec::new();
    for cliche in patterns.cliches {
        let mut from = 0;
        while from <= text.len() {
            let Some(m) = cliche.matcher.find_at(text, from) else {
                break;
            };
            let position = offsets.position(m.start(), m.end());
            results.push(Suggestion {
                id: format!("cliche-{}", position.start),
                kind: SuggestionKind::Cliche,
                severity: Severity::Low,
                message: format!("Cliché: \"{}\"", cliche.phrase),
                position,
                explanation: Some("Clichés can make writing feel stale.".to_string()),
                details: None,
            });
            from = m.start() + first_char_len(m.as_str());
        }
    }
    results
}

/// Sentences over the word threshold, located by a forward scan that
/// resumes after the previous flagged sentence.
pub fn long_sentences(
    text: &str,
    offsets: &CharOffsets,
    metrics: &TextMetrics,
    settings: &SuggestionSettings,
) -> Vec<Suggestion> {
    let mut results = Vec::new();
    let mut search_from = 0;
    for sentence in &metrics.sentences {
        let word_count = sentence.split_whitespace().count();
        if word_count <= settings.long_sentence_words {
            continue;
        }
        let Some(found) = text.get(search_from..).and_then(|rest| rest.find(sentence.as_str()))
        else {
            continue;
        };
        let start = search_from + found;
        let end = start + sentence.len();
        let position = offsets.position(start, end);
        let severity = if word_count > settings.very_long_sentence_words {
            Severity::High
        } else {
            Severity::Medium
        };
        results.push(Suggestion {
            id: format!("long-sentence-{}", position.start),
            kind: SuggestionKind::LongSentence,
            severity,
            message: format!("Long sentence ({} words)", word_count),
            position,
            explanation: Some("Long sentences can be hard to follow.".to_string()),
            details: None,
        });
        search_from = end;
    }
    results
}

/// Every occurrence of each distinct over-long word, in first-seen order.
pub fn complex_words(
    text: &str,
    offsets: &CharOffsets,
    metrics: &TextMetrics,
    settings: &SuggestionSettings,
) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    let mut results = Vec::new();
    for word in &metrics.words {
        if word.chars().count() <= settings.complex_word_length || !seen.insert(word.as_str()) {
            continue;
        }
        let mut from = 0;
        while let Some(found) = text.get(from..).and_then(|rest| rest.find(word.as_str())) {
            let start = from + found;
            let position = offsets.position(start, start + word.len());
            results.push(Suggestion {
                id: format!("complex-{}", position.start),
                kind: SuggestionKind::ComplexWord,
                severity: Severity::Low,
                message: format!("Complex word: \"{}\"", word),
                position,
                explanation: Some("Simpler words are often easier to understand.".to_string()),
                details: None,
            });
            from = start + first_char_len(word);
        }
    }
    results
}

/// Convert style checker findings, dropping any that fall outside the text.
pub fn grammar(text: &str, offsets: &CharOffsets, issues: Vec<StyleIssue>) -> Vec<Suggestion> {
    issues
        .into_iter()
        .filter(|issue| {
            let end = issue.index.saturating_add(issue.length);
            end <= text.len() && text.is_char_boundary(issue.index) && text.is_char_boundary(end)
        })
        .map(|issue| {
            let position = offsets.position(issue.index, issue.index + issue.length);
            Suggestion {
                id: format!("grammar-{}", position.start),
                kind: SuggestionKind::Grammar,
                severity: Severity::Medium,
                message: issue.reason,
                position,
                explanation: Some("Review grammar and style suggestions.".to_string()),
                details: None,
            }
        })
        .collect()
}
