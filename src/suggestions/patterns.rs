//! Per-language passive voice patterns and cliché phrase lists.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language::{Language, RuleSet};

/// be-verb + participle, and has/have/had been + participle.
static ENGLISH_PASSIVE: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(is|are|was|were|be|been|being)\s+(\w+ed|\w+en)\b")
            .expect("english passive regex"),
        Regex::new(r"(?i)\b(has|have|had)\s+been\s+(\w+ed|\w+en)\b")
            .expect("english perfect passive regex"),
    ]
});

/// ser/estar/ter conjugations + participle.
static PORTUGUESE_PASSIVE: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r"(?i)\b(fui|foi|fomos|foram|era|eram|será|serão|seria|seriam|tenho\s+sido|tem\s+sido|tinha\s+sido|terá\s+sido)\s+\w+([ai]d[oa]s?|t[oa]s?|s[oa]s?|ch[oa]s?)\b",
        )
        .expect("portuguese passive regex"),
        Regex::new(
            r"(?i)\b(estou|está|estamos|estão|estava|estavam|esteve|estiveram|estará|estarão)\s+\w+([ai]d[oa]s?)\b",
        )
        .expect("portuguese estar passive regex"),
    ]
});

const ENGLISH_CLICHES: &[&str] = &[
    "at the end of the day",
    "in this day and age",
    "time will tell",
    "easier said than done",
    "last but not least",
    "the bottom line",
    "make no mistake",
    "it goes without saying",
];

const PORTUGUESE_CLICHES: &[&str] = &[
    "no final das contas",
    "hoje em dia",
    "ao longo do tempo",
    "falar é fácil",
    "por último, mas não menos importante",
    "a verdade é que",
    "fazer a diferença",
    "nos dias de hoje",
    "em última análise",
];

/// A cliché phrase and its case-insensitive matcher.
pub struct Cliche {
    pub phrase: &'static str,
    pub matcher: Regex,
}

fn compile_cliches(phrases: &'static [&'static str]) -> Vec<Cliche> {
    phrases
        .iter()
        .map(|phrase| Cliche {
            phrase,
            matcher: Regex::new(&format!("(?i){}", regex::escape(phrase)))
                .expect("escaped cliche regex"),
        })
        .collect()
}

static ENGLISH_CLICHE_SET: Lazy<Vec<Cliche>> = Lazy::new(|| compile_cliches(ENGLISH_CLICHES));
static PORTUGUESE_CLICHE_SET: Lazy<Vec<Cliche>> =
    Lazy::new(|| compile_cliches(PORTUGUESE_CLICHES));

/// Pattern sets selected by language.
#[derive(Clone, Copy)]
pub struct PatternSet {
    pub passive: &'static [Regex],
    pub cliches: &'static [Cliche],
}

impl PatternSet {
    pub fn for_language(language: Language) -> Self {
        match language.rules() {
            RuleSet::English => Self {
                passive: &ENGLISH_PASSIVE,
                cliches: &ENGLISH_CLICHE_SET,
            },
            RuleSet::Portuguese => Self {
                passive: &PORTUGUESE_PASSIVE,
                cliches: &PORTUGUESE_CLICHE_SET,
            },
        }
    }
}
