//! Grammar and style checking capability.
//!
//! The suggestion engine treats any [`StyleChecker`] as optional: an `Err`
//! from [`StyleChecker::check`] is logged and contributes no suggestions.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// One finding. `index` and `length` are byte offsets into the checked text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleIssue {
    pub index: usize,
    pub length: usize,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum StyleCheckError {
    #[error("style checker failed: {0}")]
    Failed(String),
}

pub trait StyleChecker: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<StyleIssue>, StyleCheckError>;
}

const WEASEL_WORDS: &[&str] = &[
    "many",
    "various",
    "very",
    "fairly",
    "several",
    "extremely",
    "exceedingly",
    "quite",
    "remarkably",
    "few",
    "surprisingly",
    "mostly",
    "largely",
    "huge",
    "tiny",
    "excellent",
    "interestingly",
    "significantly",
    "substantially",
    "clearly",
    "vast",
    "relatively",
    "completely",
    "literally",
];

/// Words ending in "ly" that are not adverbs.
const NOT_ADVERBS: &[&str] = &[
    "only", "early", "family", "likely", "unlikely", "reply", "supply", "apply", "imply",
    "comply", "multiply", "fly", "butterfly", "july", "italy", "holy", "ugly", "belly", "jelly",
    "daily", "weekly", "monthly", "yearly", "hourly", "nightly", "friendly", "lonely", "lovely",
    "lively", "silly", "rely", "ally", "rally", "tally", "bully", "assembly", "anomaly", "lily",
    "folly", "holly", "jolly", "melancholy", "monopoly", "curly", "costly", "elderly", "orderly",
    "timely", "homely", "oily", "sly", "ply", "wholly", "emily", "sally",
];

const WORDY_PHRASES: &[&str] = &[
    "a number of",
    "absolutely essential",
    "actual fact",
    "along the lines of",
    "at the present time",
    "at this point in time",
    "basic fundamentals",
    "due to the fact that",
    "each and every",
    "end result",
    "first and foremost",
    "for the purpose of",
    "has the ability to",
    "in close proximity",
    "in order to",
    "in spite of the fact that",
    "in the event that",
    "in the near future",
    "in the process of",
    "is able to",
    "it is important to note",
    "on a daily basis",
    "past history",
    "prior to",
    "subsequent to",
    "the majority of",
    "utilize",
    "utilization",
    "whether or not",
    "with reference to",
    "with regard to",
];

fn word_alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[\w']+\b").expect("word regex"));
static WEASEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", word_alternation(WEASEL_WORDS))).expect("weasel regex")
});
static ADVERB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b\w+ly\b").expect("adverb regex"));
static SO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^|[.!?]\s+)(So)\b").expect("so regex"));
static THERE_IS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^|[.!?]\s+)((?i:there)\s+(?i:is|are))\b").expect("there is regex")
});
static WORDY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", word_alternation(WORDY_PHRASES))).expect("wordy regex")
});

/// Built-in English checker for weasel words, adverbs, sentence-initial
/// "So" and "There is/are", wordy phrases and accidentally repeated words.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordinessChecker;

impl WordinessChecker {
    fn lexical_illusions(text: &str, issues: &mut Vec<StyleIssue>) {
        let mut previous: Option<regex::Match<'_>> = None;
        for current in WORD_RE.find_iter(text) {
            if let Some(prev) = previous {
                let gap = &text[prev.end()..current.start()];
                let same = prev.as_str().to_lowercase() == current.as_str().to_lowercase();
                if same && !gap.is_empty() && gap.chars().all(char::is_whitespace) {
                    issues.push(StyleIssue {
                        index: prev.start(),
                        length: current.end() - prev.start(),
                        reason: format!("\"{}\" is repeated", current.as_str()),
                    });
                }
            }
            previous = Some(current);
        }
    }
}

impl StyleChecker for WordinessChecker {
    fn check(&self, text: &str) -> Result<Vec<StyleIssue>, StyleCheckError> {
        let mut issues = Vec::new();

        Self::lexical_illusions(text, &mut issues);

        for caps in SO_RE.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                issues.push(StyleIssue {
                    index: m.start(),
                    length: m.len(),
                    reason: "\"So\" adds no meaning".to_string(),
                });
            }
        }

        for caps in THERE_IS_RE.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                issues.push(StyleIssue {
                    index: m.start(),
                    length: m.len(),
                    reason: format!("\"{}\" is unnecessary verbiage", m.as_str()),
                });
            }
        }

        for m in WEASEL_RE.find_iter(text) {
            issues.push(StyleIssue {
                index: m.start(),
                length: m.len(),
                reason: format!("\"{}\" is a weasel word", m.as_str()),
            });
        }

        for m in ADVERB_RE.find_iter(text) {
            let lower = m.as_str().to_lowercase();
            if NOT_ADVERBS.contains(&lower.as_str()) || WEASEL_WORDS.contains(&lower.as_str()) {
                continue;
            }
            issues.push(StyleIssue {
                index: m.start(),
                length: m.len(),
                reason: format!("\"{}\" can weaken meaning", m.as_str()),
            });
        }

        for m in WORDY_RE.find_iter(text) {
            issues.push(StyleIssue {
                index: m.start(),
                length: m.len(),
                reason: format!("\"{}\" is wordy or unneeded", m.as_str()),
            });
        }

        issues.sort_by(|a, b| a.index.cmp(&b.index).then(a.length.cmp(&b.length)));
        Ok(issues)
    }
}
