//! Sentence boundary detection.
//!
//! [`SentenceSplitter`] is the pluggable boundary; [`RuleBasedSplitter`] is
//! the default. It ends a sentence at a run of `.`, `!` or `?` (plus any
//! closing quotes or brackets) followed by whitespace or end of input, except
//! after a known abbreviation or a single-letter initial. A blank line always
//! ends a sentence.

use crate::language::{Language, RuleSet};

/// Splits text into trimmed, non-empty sentences.
///
/// Implementations must return slices whose concatenation reconstructs the
/// input modulo whitespace.
pub trait SentenceSplitter: Send + Sync {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "e.g.", "i.e.",
    "inc.", "ltd.", "co.", "corp.", "no.", "vol.", "fig.", "approx.", "dept.", "est.", "jan.",
    "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.", "sept.", "oct.", "nov.", "dec.",
    "a.m.", "p.m.", "u.s.", "u.k.",
];

const PORTUGUESE_ABBREVIATIONS: &[&str] = &[
    "sr.", "sra.", "srta.", "dr.", "dra.", "prof.", "profa.", "etc.", "ex.", "p.ex.", "pág.",
    "págs.", "cap.", "vol.", "nº.", "av.", "cia.", "ltda.", "obs.", "tel.", "jan.", "fev.",
    "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '»', '”', '’'];

/// Default splitter with a per-language abbreviation exception list.
#[derive(Debug, Clone)]
pub struct RuleBasedSplitter {
    abbreviations: &'static [&'static str],
}

impl RuleBasedSplitter {
    pub fn new(language: Language) -> Self {
        let abbreviations = match language.rules() {
            RuleSet::English => ENGLISH_ABBREVIATIONS,
            RuleSet::Portuguese => PORTUGUESE_ABBREVIATIONS,
        };
        Self { abbreviations }
    }

    /// Whether the word ending at `end` (exclusive, ends with '.') is an abbreviation.
    fn is_abbreviation(&self, text: &str, end: usize) -> bool {
        let start = text[..end]
            .rfind(char::is_whitespace)
            .map(|i| i + text[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0);
        let token = text[start..end].trim_start_matches(['(', '[', '"', '\'', '“', '‘']);
        let lower = token.to_lowercase();

        // Single-letter initial such as "J."
        let mut chars = lower.chars();
        if let (Some(c), Some('.'), None) = (chars.next(), chars.next(), chars.next()) {
            if c.is_alphabetic() {
                return true;
            }
        }

        self.abbreviations.contains(&lower.as_str())
    }
}

impl Default for RuleBasedSplitter {
    fn default() -> Self {
        Self::new(Language::English)
    }
}

impl SentenceSplitter for RuleBasedSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut iter = text.char_indices().peekable();

        let push = |from: usize, to: usize, out: &mut Vec<&'a str>| {
            let s = text[from..to].trim();
            if !s.is_empty() {
                out.push(s);
            }
        };

        while let Some((i, c)) = iter.next() {
            match c {
                '.' | '!' | '?' => {
                    let mut end = i + c.len_utf8();
                    let mut only_period = c == '.';
                    while let Some(&(j, next)) = iter.peek() {
                        if matches!(next, '.' | '!' | '?') {
                            only_period &= next == '.';
                            end = j + next.len_utf8();
                            iter.next();
                        } else {
                            break;
                        }
                    }
                    let terminator_end = end;
                    while let Some(&(j, next)) = iter.peek() {
                        if CLOSERS.contains(&next) {
                            end = j + next.len_utf8();
                            iter.next();
                        } else {
                            break;
                        }
                    }

                    let at_boundary = iter.peek().map_or(true, |&(_, next)| next.is_whitespace());
                    if !at_boundary {
                        continue;
                    }
                    let single_period = only_period && terminator_end - i == 1;
                    if single_period && self.is_abbreviation(text, terminator_end) {
                        continue;
                    }
                    push(start, end, &mut sentences);
                    start = end;
                }
                '\n' => {
                    // Blank line: newline, optional spaces, newline
                    let rest = &text[i + 1..];
                    let gap = rest.len() - rest.trim_start_matches([' ', '\t', '\r']).len();
                    if rest[gap..].starts_with('\n') {
                        push(start, i, &mut sentences);
                        start = i;
                    }
                }
                _ => {}
            }
        }
        push(start, text.len(), &mut sentences);
        sentences
    }
}
