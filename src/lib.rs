//! SmartWrite Library
//!
//! Writing analysis for prose: segmentation, word frequency, readability
//! formulas, rule-based style suggestions, and persona-driven LLM reviews
//! with single-flight execution.

pub mod cli;
pub mod config;
pub mod language;
pub mod llm;
pub mod persona;
pub mod pipeline;
pub mod readability;
pub mod stats;
pub mod suggestions;
pub mod text;
pub mod translation;

pub use config::Config;
pub use language::{Language, LanguageSetting};
pub use llm::{CancelToken, CompletionBackend, CompletionError, OllamaBackend};
pub use persona::{
    AnalysisOutcome, AnalysisRequest, Persona, PersonaAnalysisResult, PersonaCatalog,
    PersonaOrchestrator,
};
pub use pipeline::{analyze, AnalysisSettings, TextAnalysis, TextAnalyzer};
pub use readability::{ReadabilityEngine, ReadabilityLevel, ReadabilityScores};
pub use stats::TextStats;
pub use suggestions::{Suggestion, SuggestionEngine, SuggestionKind, SuggestionReport, Severity};
pub use text::TextMetrics;
pub use translation::{TranslationResult, Translator};
