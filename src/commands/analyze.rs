//! Analyze command handler
//!
//! Runs the local analysis pipeline over each input (files in parallel with
//! rayon) and prints a text report or JSON.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use smartwrite::stats::format_reading_time;
use smartwrite::{LanguageSetting, TextAnalysis, TextAnalyzer};

use super::{load_config, read_input};

/// How many suggestions the text report lists before summarising the rest.
const MAX_LISTED_SUGGESTIONS: usize = 20;

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a str,
    #[serde(flatten)]
    analysis: &'a TextAnalysis,
}

/// Analyze files (or standard input) and print the results.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config_path: Option<&Path>,
    files: &[PathBuf],
    language: Option<LanguageSetting>,
    json: bool,
) -> Result<()> {
    let (config, _) = load_config(config_path)?;
    let mut settings = config.analysis_settings();
    if let Some(language) = language {
        settings.language = language;
    }
    let analyzer = TextAnalyzer::new();

    let reports: Vec<(String, TextAnalysis)> = if files.is_empty() {
        let input = read_input(None)?;
        vec![(input.title, analyzer.analyze(&input.text, &settings))]
    } else {
        files
            .par_iter()
            .map(|path| {
                let input = read_input(Some(path))?;
                let name = path.display().to_string();
                Ok((name, analyzer.analyze(&input.text, &settings)))
            })
            .collect::<Result<Vec<_>>>()?
    };

    if json {
        let entries: Vec<FileReport> = reports
            .iter()
            .map(|(file, analysis)| FileReport { file, analysis })
            .collect();
        let out = if entries.len() == 1 {
            serde_json::to_string_pretty(&entries[0])
        } else {
            serde_json::to_string_pretty(&entries)
        }
        .context("Failed to serialize analysis")?;
        println!("{}", out);
    } else {
        let rendered: Vec<String> = reports
            .iter()
            .map(|(name, analysis)| render_report(name, analysis))
            .collect();
        println!("{}", rendered.join("\n"));
    }
    Ok(())
}

/// Human-readable report for one document.
pub fn render_report(name: &str, analysis: &TextAnalysis) -> String {
    let stats = &analysis.stats;
    let scores = &analysis.readability;
    let mut out = String::new();

    let _ = writeln!(out, "== {} ({}) ==", name, analysis.language.display_name());
    let _ = writeln!(
        out,
        "Words: {}  Sentences: {}  Paragraphs: {}  Characters: {} ({} without spaces)",
        stats.word_count,
        stats.sentence_count,
        stats.paragraph_count,
        stats.character_count,
        stats.character_count_no_spaces
    );
    let _ = writeln!(
        out,
        "Reading time: {}  Avg sentence: {:.1} words  Avg word: {:.1} letters",
        format_reading_time(stats.reading_time_minutes),
        stats.average_sentence_length,
        stats.average_word_length
    );

    let _ = writeln!(out, "\nReadability: {}", scores.overall_level);
    for (label, score) in [
        ("Flesch reading ease", scores.flesch_reading_ease),
        ("Flesch-Kincaid grade", scores.flesch_kincaid_grade),
        ("Gunning Fog", scores.gunning_fog),
        ("Coleman-Liau", scores.coleman_liau),
        ("Automated readability", scores.automated_readability),
        ("Dale-Chall", scores.dale_chall),
    ] {
        let _ = writeln!(out, "  {:<22} {:>6.1}", label, score);
    }
    let _ = writeln!(out, "  {}", scores.interpretation);

    if !stats.top_words.is_empty() {
        let top: Vec<String> = stats
            .top_words
            .iter()
            .map(|w| format!("{} ({})", w.word, w.count))
            .collect();
        let _ = writeln!(out, "\nTop words: {}", top.join(", "));
    }

    let report = &analysis.suggestions;
    let _ = writeln!(out, "\nSuggestions: {}", report.summary.total);
    for suggestion in report.suggestions.iter().take(MAX_LISTED_SUGGESTIONS) {
        let _ = writeln!(
            out,
            "  [{}] {} @{}-{}: {}",
            suggestion.severity,
            suggestion.kind,
            suggestion.position.start,
            suggestion.position.end,
            suggestion.message
        );
    }
    if report.suggestions.len() > MAX_LISTED_SUGGESTIONS {
        let _ = writeln!(
            out,
            "  ... and {} more (use --json for all)",
            report.suggestions.len() - MAX_LISTED_SUGGESTIONS
        );
    }
    out
}
