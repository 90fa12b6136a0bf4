//! Markdown analysis documents.
//!
//! One result renders as a single-persona report; several render as a
//! multi-persona report with one section per persona.

use chrono::NaiveDateTime;
use deunicode::deunicode;

use super::PersonaAnalysisResult;

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the analysis document for `results`.
pub fn render_markdown(
    title: &str,
    results: &[PersonaAnalysisResult],
    generated_at: NaiveDateTime,
) -> String {
    let mut doc = format!(
        "# Analysis: {}\n\n**Date:** {}\n\n",
        title,
        generated_at.format(DATE_FORMAT)
    );

    match results {
        [] => doc.push_str("No feedback generated."),
        [single] => {
            doc.push_str(&format!(
                "**Persona:** {}\n\n## AI feedback\n\n{}",
                single.persona_name,
                feedback(single)
            ));
        }
        many => {
            doc.push_str(&format!(
                "**Multi-Persona Analysis ({} personas)**\n\n---\n\n",
                many.len()
            ));
            for result in many {
                doc.push_str(&format!(
                    "## {} feedback\n\n{}\n\n---\n\n",
                    result.persona_name,
                    feedback(result)
                ));
            }
        }
    }
    doc
}

fn feedback(result: &PersonaAnalysisResult) -> String {
    if !result.analysis.is_empty() {
        result.analysis.clone()
    } else if let Some(error) = &result.error {
        error.to_string()
    } else {
        "No feedback generated.".to_string()
    }
}

/// File name for the document, e.g. `Analysis - Critical Editor - 9-7-3.md`.
pub fn file_name(results: &[PersonaAnalysisResult], at: NaiveDateTime) -> String {
    let base = match results {
        [single] => format!("Analysis - {}", single.persona_name),
        _ => "Full analysis".to_string(),
    };
    format!("{} - {}.md", sanitize(&base), time_stamp(at))
}

/// Unpadded `H-M-S` time used in generated file names.
pub fn time_stamp(at: NaiveDateTime) -> String {
    at.format("%-H-%-M-%-S").to_string()
}

/// ASCII-fold and drop characters filesystems reject.
pub fn sanitize(input: &str) -> String {
    let folded: String = deunicode(input)
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c) && !c.is_control())
        .collect();
    let trimmed = folded.trim().trim_matches('.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
