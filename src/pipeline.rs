//! One-call analysis: metrics, stats, suggestions and readability.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::language::{Language, LanguageSetting, RuleSet};
use crate::readability::{ReadabilityEngine, ReadabilityScores};
use crate::stats::{TextStats, DEFAULT_READING_SPEED};
use crate::suggestions::{
    StyleChecker, SuggestionEngine, SuggestionReport, SuggestionSettings, WordinessChecker,
};
use crate::text::{DictionaryHyphenator, Hyphenator, RuleBasedSplitter, SentenceSplitter, TextMetrics};

/// Everything the pure analyzers need, passed explicitly on each call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub language: LanguageSetting,
    /// Words per minute.
    pub reading_speed: u32,
    pub suggestions: SuggestionSettings,
    /// Run the built-in style checker (English rules only).
    pub style_checks: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            language: LanguageSetting::Auto,
            reading_speed: DEFAULT_READING_SPEED,
            suggestions: SuggestionSettings::default(),
            style_checks: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    pub language: Language,
    pub metrics: TextMetrics,
    pub stats: TextStats,
    pub suggestions: SuggestionReport,
    pub readability: ReadabilityScores,
}

/// Analyzer with injectable capabilities.
///
/// Holds no per-call state; one instance can serve many threads.
pub struct TextAnalyzer {
    hyphenator: Box<dyn Hyphenator>,
    splitter: Option<Box<dyn SentenceSplitter>>,
    style_checker: Option<Arc<dyn StyleChecker>>,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self {
            hyphenator: Box::new(DictionaryHyphenator),
            splitter: None,
            style_checker: None,
        }
    }
}

impl TextAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hyphenator(mut self, hyphenator: Box<dyn Hyphenator>) -> Self {
        self.hyphenator = hyphenator;
        self
    }

    /// Use `splitter` for every language instead of the per-language default.
    pub fn with_sentence_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Replace the built-in style checker.
    pub fn with_style_checker(mut self, checker: Arc<dyn StyleChecker>) -> Self {
        self.style_checker = Some(checker);
        self
    }

    fn style_checker_for(
        &self,
        language: Language,
        settings: &AnalysisSettings,
    ) -> Option<Arc<dyn StyleChecker>> {
        if !settings.style_checks {
            return None;
        }
        match (&self.style_checker, language.rules()) {
            (Some(custom), _) => Some(Arc::clone(custom)),
            (None, RuleSet::English) => Some(Arc::new(WordinessChecker)),
            (None, RuleSet::Portuguese) => None,
        }
    }

    pub fn analyze(&self, text: &str, settings: &AnalysisSettings) -> TextAnalysis {
        let language = settings.language.resolve(text);
        debug!(language = %language, chars = text.len(), "Analyzing text");

        let metrics = match &self.splitter {
            Some(splitter) => {
                TextMetrics::compute(text, language, splitter.as_ref(), self.hyphenator.as_ref())
            }
            None => TextMetrics::compute(
                text,
                language,
                &RuleBasedSplitter::new(language),
                self.hyphenator.as_ref(),
            ),
        };

        let stats = TextStats::from_metrics(&metrics, settings.reading_speed);
        let readability = ReadabilityEngine::calculate(&metrics, language);

        let mut engine = SuggestionEngine::new(language, settings.suggestions.clone());
        if let Some(checker) = self.style_checker_for(language, settings) {
            engine = engine.with_style_checker(checker);
        }
        let suggestions = engine.analyze(text, &metrics);

        TextAnalysis {
            language,
            metrics,
            stats,
            suggestions,
            readability,
        }
    }
}

/// Analyze with the default capabilities.
pub fn analyze(text: &str, settings: &AnalysisSettings) -> TextAnalysis {
    TextAnalyzer::default().analyze(text, settings)
}
