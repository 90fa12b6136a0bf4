//! Configuration management for SmartWrite

mod edit;
mod io;
mod types;

pub use edit::set_value;
pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::OllamaSettings;
use crate::persona::{OrchestratorSettings, Persona, PersonaCatalog};
use crate::pipeline::AnalysisSettings;
use crate::suggestions::SuggestionSettings;

/// Upper bound for the request timeout, in seconds.
const MAX_TIMEOUT_SECS: u64 = 3600;

/// Smallest accepted chunk budget, in characters.
const MIN_CHUNK_SIZE: usize = 500;

impl Config {
    /// `path` when given, the default location otherwise
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => io::config_path(),
        }
    }

    /// Load configuration from `path`, or defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        io::save_to(self, path)
    }

    /// Validate configuration values.
    ///
    /// Returns `Ok(())` if all values are within acceptable bounds,
    /// or an error describing the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        let analysis = &self.analysis;
        if analysis.reading_speed == 0 {
            return Err("analysis.reading_speed must be > 0".to_string());
        }
        if analysis.reading_speed > 2000 {
            return Err(format!(
                "analysis.reading_speed {} exceeds maximum (2000)",
                analysis.reading_speed
            ));
        }
        if analysis.long_sentence_words == 0 {
            return Err("analysis.long_sentence_words must be > 0".to_string());
        }
        if analysis.very_long_sentence_words < analysis.long_sentence_words {
            return Err(format!(
                "analysis.very_long_sentence_words ({}) must be >= long_sentence_words ({})",
                analysis.very_long_sentence_words, analysis.long_sentence_words
            ));
        }
        if analysis.complex_word_length == 0 {
            return Err("analysis.complex_word_length must be > 0".to_string());
        }

        let llm = &self.llm;
        if llm.endpoint.trim().is_empty() {
            return Err("llm.endpoint must not be empty".to_string());
        }
        if llm.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }
        if llm.timeout_secs == 0 {
            return Err("llm.timeout_secs must be > 0".to_string());
        }
        if llm.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(format!(
                "llm.timeout_secs {} exceeds maximum ({}s)",
                llm.timeout_secs, MAX_TIMEOUT_SECS
            ));
        }
        if llm.chunk_size < MIN_CHUNK_SIZE {
            return Err(format!(
                "llm.chunk_size {} is below minimum ({})",
                llm.chunk_size, MIN_CHUNK_SIZE
            ));
        }
        if llm.translation_chunk_size < MIN_CHUNK_SIZE {
            return Err(format!(
                "llm.translation_chunk_size {} is below minimum ({})",
                llm.translation_chunk_size, MIN_CHUNK_SIZE
            ));
        }

        for persona in &self.personas.custom {
            persona.validate()?;
        }
        Ok(())
    }

    /// Settings for the local analysis pipeline
    pub fn analysis_settings(&self) -> AnalysisSettings {
        let analysis = &self.analysis;
        AnalysisSettings {
            language: analysis.language,
            reading_speed: analysis.reading_speed,
            suggestions: SuggestionSettings {
                long_sentence_words: analysis.long_sentence_words,
                very_long_sentence_words: analysis.very_long_sentence_words,
                complex_word_length: analysis.complex_word_length,
                repetition_high_threshold: analysis.repetition_high_threshold,
            },
            style_checks: analysis.style_checks,
        }
    }

    pub fn ollama_settings(&self) -> OllamaSettings {
        OllamaSettings {
            enabled: self.llm.enabled,
            endpoint: self.llm.endpoint.clone(),
            model: self.llm.model.clone(),
            timeout: Duration::from_secs(self.llm.timeout_secs),
        }
    }

    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            chunk_size: self.llm.chunk_size,
            output_language: self.llm.output_language,
            ..OrchestratorSettings::default()
        }
    }

    /// Built-in personas plus `[personas].custom`, with the configured enabled set
    pub fn persona_catalog(&self) -> PersonaCatalog {
        PersonaCatalog::new(
            self.personas.custom.clone(),
            self.personas.enabled.clone(),
        )
    }

    /// Add or replace a custom persona and enable it
    pub fn upsert_custom_persona(&mut self, persona: Persona) {
        if !self.personas.enabled.contains(&persona.id) {
            self.personas.enabled.push(persona.id.clone());
        }
        match self
            .personas
            .custom
            .iter_mut()
            .find(|p| p.id == persona.id)
        {
            Some(existing) => *existing = persona,
            None => self.personas.custom.push(persona),
        }
    }
}
