//! Document language selection and detection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the analyzers know about.
///
/// Only English and Portuguese have dedicated heuristics (syllables,
/// passive voice, clichés, stop words). Everything else uses English rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
}

/// Whole-word markers that flag a text as Portuguese.
static PORTUGUESE_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|[^\p{L}])(que|para|com|uma|este|não)([^\p{L}]|$)")
        .expect("portuguese marker regex")
});

impl Language {
    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Portuguese => "pt",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
        }
    }

    /// Human-readable name used when instructing a model to answer in this language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English (US)",
            Language::Portuguese => "Portuguese (Brazil)",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
        }
    }

    /// Cheap detection: Portuguese if a common function word appears, English otherwise.
    pub fn detect(text: &str) -> Self {
        if PORTUGUESE_MARKERS.is_match(text) {
            Language::Portuguese
        } else {
            Language::English
        }
    }

    /// The language whose heuristic rule set applies.
    pub fn rules(&self) -> RuleSet {
        match self {
            Language::Portuguese => RuleSet::Portuguese,
            _ => RuleSet::English,
        }
    }
}

/// Heuristic families. Unsupported languages fall back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    English,
    Portuguese,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        // Accept regional tags such as "pt-br" or "en-us"
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "en" | "english" => Ok(Language::English),
            "pt" | "portuguese" => Ok(Language::Portuguese),
            "es" | "spanish" => Ok(Language::Spanish),
            "fr" | "french" => Ok(Language::French),
            "de" | "german" => Ok(Language::German),
            _ => Err(format!(
                "Unknown language '{}'. Valid: en, pt, es, fr, de",
                s
            )),
        }
    }
}

/// A configured language: fixed, or detected from the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageSetting {
    #[default]
    Auto,
    Fixed(Language),
}

impl LanguageSetting {
    pub fn resolve(&self, text: &str) -> Language {
        match self {
            LanguageSetting::Auto => Language::detect(text),
            LanguageSetting::Fixed(lang) => *lang,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, LanguageSetting::Auto)
    }
}

impl fmt::Display for LanguageSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageSetting::Auto => write!(f, "auto"),
            LanguageSetting::Fixed(lang) => write!(f, "{}", lang),
        }
    }
}

impl FromStr for LanguageSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(LanguageSetting::Auto)
        } else {
            s.parse().map(LanguageSetting::Fixed)
        }
    }
}

impl Serialize for LanguageSetting {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LanguageSetting {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
