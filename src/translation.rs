//! Chunked literary translation through the completion backend.
//!
//! Text is split at paragraph breaks into chunks of at most
//! `chunk_size` characters. After each chunk a two-sentence summary of the
//! translation is requested and fed into the next chunk's system prompt so
//! names and terminology stay consistent across the document.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::language::{Language, LanguageSetting};
use crate::llm::{CancelToken, CompletionBackend, CompletionError};
use crate::persona::report::{sanitize, time_stamp};

/// Default translation chunk budget in characters.
pub const DEFAULT_TRANSLATION_CHUNK_SIZE: usize = 4_000;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TranslationError {
    #[error("Ollama is disabled in settings")]
    Disabled,

    #[error("Please select a specific target language for translation")]
    AutoTarget,

    #[error("Translation cancelled by user")]
    Cancelled,

    #[error("Failed at part {part}: {message}")]
    Failed { part: usize, message: String },
}

impl Serialize for TranslationError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a translation run. On failure `translated_text` holds the
/// parts finished before the failing one and `chunks` counts them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TranslationError>,
}

impl TranslationResult {
    fn failed(error: TranslationError) -> Self {
        Self {
            translated_text: String::new(),
            chunks: 0,
            error: Some(error),
        }
    }
}

pub struct Translator {
    backend: Arc<dyn CompletionBackend>,
    chunk_size: usize,
}

impl Translator {
    pub fn new(backend: Arc<dyn CompletionBackend>, chunk_size: usize) -> Self {
        Self {
            backend,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Translate `text` into `target`.
    ///
    /// `source` of `Auto` is resolved by detection. The progress callback
    /// receives a status line and a percentage.
    pub fn translate(
        &self,
        text: &str,
        source: LanguageSetting,
        target: LanguageSetting,
        on_progress: Option<&dyn Fn(&str, u8)>,
        cancel: &CancelToken,
    ) -> TranslationResult {
        let target = match target {
            LanguageSetting::Fixed(lang) => lang,
            LanguageSetting::Auto => return TranslationResult::failed(TranslationError::AutoTarget),
        };
        if !self.backend.is_enabled() {
            return TranslationResult::failed(TranslationError::Disabled);
        }
        let source = source.resolve(text);

        let report = |message: &str, percent: u8| {
            if let Some(callback) = on_progress {
                callback(message, percent);
            }
        };

        let chunks = split_at_paragraphs(text, self.chunk_size);
        let total = chunks.len();
        let mut parts: Vec<String> = Vec::with_capacity(total);
        let mut summary = String::new();
        info!(source = %source, target = %target, chunks = total, "Starting translation");

        report("Preparing translation...", 0);
        for (i, chunk) in chunks.iter().enumerate() {
            let percent = ((i as f64 / total as f64) * 100.0).round() as u8;
            report(&format!("Translating part {}/{}...", i + 1, total), percent);

            match self.translate_chunk(chunk, source, target, &summary, i + 1 < total, cancel) {
                Ok((translation, next_summary)) => {
                    parts.push(translation);
                    summary = next_summary;
                }
                Err(error) => {
                    let error = match error {
                        CompletionError::Cancelled => TranslationError::Cancelled,
                        other => TranslationError::Failed {
                            part: i + 1,
                            message: other.to_string(),
                        },
                    };
                    warn!(part = i + 1, error = %error, "Translation stopped");
                    return TranslationResult {
                        translated_text: parts.join("\n\n"),
                        chunks: i,
                        error: Some(error),
                    };
                }
            }
        }

        report("Finalizing...", 100);
        TranslationResult {
            translated_text: parts.join("\n\n"),
            chunks: total,
            error: None,
        }
    }

    /// Translate one chunk, then summarise it when another chunk follows.
    fn translate_chunk(
        &self,
        chunk: &str,
        source: Language,
        target: Language,
        summary: &str,
        summarize: bool,
        cancel: &CancelToken,
    ) -> Result<(String, String), CompletionError> {
        let mut system = format!(
            "You are a professional literary translator. Translate the following text from {} to {}. Preserve the tone, style, and formatting (markdown).",
            source.display_name(),
            target.display_name()
        );
        if !summary.is_empty() {
            system.push_str(&format!(
                "\n\nCONTEXT FROM PREVIOUS CHAPTERS: {}\nUse this context to maintain consistency in names, gender, and terminology.",
                summary
            ));
        }
        let prompt = format!("Translate this segment:\n\n{}", chunk);
        let translation = self.backend.complete(&prompt, &system, cancel)?;

        let next_summary = if summarize {
            let prompt = format!(
                "Summarize the following text in 2 sentences, focusing on active characters and key events. Use English. Text:\n\n{}",
                translation
            );
            let summary = self.backend.complete(&prompt, "", cancel)?;
            debug!(chars = summary.len(), "Carried context summary forward");
            summary
        } else {
            String::new()
        };
        Ok((translation, next_summary))
    }
}

/// Split into chunks of at most `size` characters, cutting at the last
/// newline inside the window when there is one.
///
/// The newline itself starts the next chunk, so joining the chunks gives
/// back the input.
pub fn split_at_paragraphs(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let limit = match rest.char_indices().nth(size) {
            Some((idx, _)) => idx,
            None => {
                chunks.push(rest);
                break;
            }
        };
        // A newline sitting exactly at the limit still counts
        let window_end = limit + rest[limit..].chars().next().map_or(0, char::len_utf8);
        let end = match rest[..window_end].rfind('\n') {
            Some(idx) if idx > 0 => idx,
            _ => limit,
        };
        chunks.push(&rest[..end]);
        rest = &rest[end..];
    }
    chunks
}

/// Markdown document for a finished translation.
pub fn render_document(
    title: &str,
    target: Language,
    translated: &str,
    generated_at: NaiveDateTime,
) -> String {
    format!(
        "# Translation: {}\n\n**Target Language:** {}\n**Date:** {}\n\n{}",
        title,
        target.display_name(),
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        translated
    )
}

/// File name such as `Translation - Draft - pt - 9-7-3.md`.
pub fn file_name(title: &str, target: Language, at: NaiveDateTime) -> String {
    format!(
        "Translation - {} - {} - {}.md",
        sanitize(title),
        target.code(),
        time_stamp(at)
    )
}
