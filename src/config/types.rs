//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::language::LanguageSetting;
use crate::llm::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::persona::chunk::DEFAULT_CHUNK_SIZE;
use crate::persona::library::{builtin_ids, DEFAULT_PERSONA_ID};
use crate::persona::Persona;
use crate::stats::DEFAULT_READING_SPEED;
use crate::translation::DEFAULT_TRANSLATION_CHUNK_SIZE;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub personas: PersonasConfig,
}

/// Local text analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Document language ("auto" detects per text)
    #[serde(default)]
    pub language: LanguageSetting,
    /// Words per minute for reading time
    #[serde(default = "default_reading_speed")]
    pub reading_speed: u32,
    #[serde(default = "default_long_sentence_words")]
    pub long_sentence_words: usize,
    #[serde(default = "default_very_long_sentence_words")]
    pub very_long_sentence_words: usize,
    #[serde(default = "default_complex_word_length")]
    pub complex_word_length: usize,
    /// Distinct repeated words above which the repetition group is high severity
    #[serde(default = "default_repetition_high_threshold")]
    pub repetition_high_threshold: usize,
    /// Run the built-in English style checker
    #[serde(default = "default_style_checks")]
    pub style_checks: bool,
}

pub fn default_reading_speed() -> u32 {
    DEFAULT_READING_SPEED
}

pub fn default_long_sentence_words() -> usize {
    25
}

pub fn default_very_long_sentence_words() -> usize {
    40
}

pub fn default_complex_word_length() -> usize {
    15
}

pub fn default_repetition_high_threshold() -> usize {
    5
}

pub fn default_style_checks() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language: LanguageSetting::Auto,
            reading_speed: default_reading_speed(),
            long_sentence_words: default_long_sentence_words(),
            very_long_sentence_words: default_very_long_sentence_words(),
            complex_word_length: default_complex_word_length(),
            repetition_high_threshold: default_repetition_high_threshold(),
            style_checks: default_style_checks(),
        }
    }
}

/// Language model integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Master switch; nothing is sent over the network while false
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Language persona feedback is written in ("auto" keeps the model's choice)
    #[serde(default)]
    pub output_language: LanguageSetting,
    /// Characters per persona analysis chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters per translation chunk
    #[serde(default = "default_translation_chunk_size")]
    pub translation_chunk_size: usize,
}

pub fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

pub fn default_timeout_secs() -> u64 {
    120
}

pub fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

pub fn default_translation_chunk_size() -> usize {
    DEFAULT_TRANSLATION_CHUNK_SIZE
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            output_language: LanguageSetting::Auto,
            chunk_size: default_chunk_size(),
            translation_chunk_size: default_translation_chunk_size(),
        }
    }
}

/// Persona selection and custom personas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonasConfig {
    /// Persona used by `review` without `--persona`
    #[serde(default = "default_selected")]
    pub selected: String,
    /// Personas that take part in `review --all`
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub custom: Vec<Persona>,
}

pub fn default_selected() -> String {
    DEFAULT_PERSONA_ID.to_string()
}

pub fn default_enabled() -> Vec<String> {
    builtin_ids()
}

impl Default for PersonasConfig {
    fn default() -> Self {
        Self {
            selected: default_selected(),
            enabled: default_enabled(),
            custom: Vec::new(),
        }
    }
}
