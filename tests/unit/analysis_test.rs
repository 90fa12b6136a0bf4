//! Unit tests for the end-to-end analysis pipeline

use std::sync::Arc;

use smartwrite::suggestions::{StyleCheckError, StyleChecker, StyleIssue};
use smartwrite::{analyze, AnalysisSettings, Language, LanguageSetting, SuggestionKind, TextAnalyzer};

fn english() -> AnalysisSettings {
    AnalysisSettings {
        language: LanguageSetting::Fixed(Language::English),
        ..Default::default()
    }
}

#[test]
fn positions_are_character_offsets_inside_the_text() {
    let text = "Ação rápida. The cake was eaten by the dog.\n\nAt the end of the day, café was served.";
    let result = analyze(text, &english());
    let length = text.chars().count();

    assert!(!result.suggestions.suggestions.is_empty());
    for suggestion in &result.suggestions.suggestions {
        assert!(suggestion.position.start <= suggestion.position.end);
        assert!(suggestion.position.end <= length);
    }
}

#[test]
fn summary_matches_suggestion_list() {
    let text = "The letter was written by John. It was very, very good. The letter was read by Mary.";
    let report = analyze(text, &english()).suggestions;

    assert_eq!(report.summary.total, report.suggestions.len());
    let by_type: usize = report.summary.by_type.values().sum();
    let by_severity: usize = report.summary.by_severity.values().sum();
    assert_eq!(by_type, report.summary.total);
    assert_eq!(by_severity, report.summary.total);
}

#[test]
fn reading_time_follows_reading_speed() {
    let text = "word ".repeat(400);
    let mut settings = english();
    settings.reading_speed = 200;
    assert_eq!(analyze(&text, &settings).stats.reading_time_minutes, 2.0);
    settings.reading_speed = 400;
    assert_eq!(analyze(&text, &settings).stats.reading_time_minutes, 1.0);
}

#[test]
fn json_uses_wire_names() {
    let result = analyze("The cake was eaten by the dog.", &english());
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["language"], "en");
    assert!(json["stats"]["word_count"].is_u64());
    assert!(json["readability"]["flesch_reading_ease"].is_number());
    let suggestions = json["suggestions"]["suggestions"].as_array().unwrap();
    assert!(suggestions.iter().any(|s| s["type"] == "passive"));
    assert_eq!(json["suggestions"]["summary"]["by_type"]["passive"], 1);
}

#[test]
fn injected_style_checker_replaces_default() {
    struct Shouty;
    impl StyleChecker for Shouty {
        fn check(&self, text: &str) -> Result<Vec<StyleIssue>, StyleCheckError> {
            Ok(text
                .match_indices('!')
                .map(|(index, _)| StyleIssue {
                    index,
                    length: 1,
                    reason: "Too loud".to_string(),
                })
                .collect())
        }
    }

    let analyzer = TextAnalyzer::new().with_style_checker(Arc::new(Shouty));
    let result = analyzer.analyze("Stop! Now!", &english());
    let grammar: Vec<_> = result
        .suggestions
        .suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::Grammar)
        .collect();
    assert_eq!(grammar.len(), 2);
    assert_eq!(grammar[0].position.start, 4);
    assert_eq!(grammar[0].position.end, 5);
}

#[test]
fn analyzer_is_shareable_across_threads() {
    let analyzer = Arc::new(TextAnalyzer::new());
    let handles: Vec<_> = ["one", "two", "three", "four"]
        .into_iter()
        .map(|name| {
            let analyzer = Arc::clone(&analyzer);
            std::thread::spawn(move || {
                let text = format!("Thread {} wrote this sentence. It was short.", name);
                analyzer.analyze(&text, &english()).stats.word_count
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 8);
    }
}
