//! Word frequency and repetition detection.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::language::{Language, RuleSet};

/// A word repeated often enough to be worth flagging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repetition {
    pub word: String,
    pub count: usize,
}

/// Minimum occurrences (exclusive) for a word to count as repeated.
pub const REPETITION_MIN_COUNT: usize = 3;
/// Minimum length in characters (exclusive) for a word to count as repeated.
pub const REPETITION_MIN_LENGTH: usize = 3;

const PORTUGUESE_STOP_WORDS: &[&str] = &[
    "de", "a", "o", "que", "e", "do", "da", "em", "um", "para", "com", "não", "uma", "os", "no",
    "se", "na", "por", "mais", "as", "dos", "como", "mas", "ao", "ele", "das", "à", "seu", "sua",
    "ou", "quando", "muito", "nos", "já", "eu", "também", "só", "pelo", "pela", "até", "isso",
    "ela", "entre", "depois", "sem", "mesmo", "aos", "seus", "quem", "nas", "me", "esse", "eles",
    "você", "essa", "num", "nem", "suas", "meu", "às", "minha", "numa", "pelos", "elas", "qual",
    "nós", "lhe", "deles", "essas", "esses", "pelas", "este", "dele", "tu", "te", "vocês", "vos",
    "lhes", "meus", "minhas", "teu", "tua", "teus", "tuas", "nosso", "nossa", "nossos", "nossas",
    "dela", "delas", "esta", "estes", "estas", "aquele", "aquela", "aqueles", "aquelas", "isto",
    "aquilo", "estou", "está", "estamos", "estão", "estive", "esteve", "estivemos", "estiveram",
    "estava", "estávamos", "estavam", "estivera", "estivéramos", "esteja", "estejamos", "estejam",
    "estivesse", "estivéssemos", "estivessem", "estiver", "estivermos", "estiverem", "hei", "há",
    "havemos", "hão", "houve", "houveram", "houvera", "houvéramos", "haja", "hajamos", "hajam",
    "houvesse", "houvéssemos", "houvessem", "houver", "houvermos", "houverem", "houverei",
    "houverá", "houveremos", "houverão", "houveria", "houveríamos", "houveriam", "sou", "somos",
    "são", "era", "éramos", "eram", "fui", "foi", "fomos", "foram", "fora", "fôramos", "seja",
    "sejamos", "sejam", "fosse", "fôssemos", "fossem", "for", "formos", "forem", "serei", "será",
    "seremos", "serão", "seria", "seríamos", "seriam", "tenho", "tem", "temos", "tém", "tinha",
    "tínhamos", "tinham", "tive", "teve", "tivemos", "tiveram", "tivera", "tivéramos", "tenha",
    "tenhamos", "tenham", "tivesse", "tivéssemos", "tivessem", "tiver", "tivermos", "tiverem",
    "terei", "terá", "teremos", "terão", "teria", "teríamos", "teriam", "uns", "umas", "sob",
    "sobre", "desde", "porém", "contudo", "todavia", "onde", "porque", "pois", "então", "assim",
    "ainda", "menos", "muita", "muitos", "muitas", "pouco", "pouca", "vós", "sim", "ser", "és",
    "é", "sido", "sendo", "estar", "estará", "estaria", "estado", "estando", "ter", "têm", "tido",
    "tendo", "haver", "havia", "haverá", "haveria", "havido", "havendo",
];

const ENGLISH_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "nor", "so", "yet", "of", "in", "on", "at", "to",
    "for", "from", "by", "with", "about", "into", "onto", "over", "under", "after", "before",
    "between", "through", "during", "without", "within", "this", "that", "these", "those",
    "there", "here", "where", "when", "what", "which", "who", "whom", "whose", "while", "then",
    "than", "also", "just", "very", "really", "only", "even", "some", "such", "more", "most",
    "much", "many", "each", "every", "other", "another", "i", "me", "my", "mine", "you", "your",
    "yours", "he", "him", "his", "she", "her", "hers", "it", "its", "we", "us", "our", "ours",
    "they", "them", "their", "theirs", "be", "is", "am", "are", "was", "were", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "will", "would", "shall",
    "should", "could", "might", "must", "can", "not", "because", "would've", "it's", "that's",
    "don't", "didn't", "doesn't", "isn't", "wasn't", "aren't", "weren't",
];

static PORTUGUESE_STOP_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| PORTUGUESE_STOP_WORDS.iter().copied().collect());
static ENGLISH_STOP_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Whether `word` (already lowercased) is a stop word for `language`.
pub fn is_stop_word(word: &str, language: Language) -> bool {
    match language.rules() {
        RuleSet::English => ENGLISH_STOP_SET.contains(word),
        RuleSet::Portuguese => PORTUGUESE_STOP_SET.contains(word),
    }
}

/// Lowercased word counts.
///
/// Iteration order of the returned map is unspecified; derive ordered
/// views from the word sequence instead (see [`first_seen_order`]).
pub fn word_frequency<S: AsRef<str>>(words: &[S]) -> HashMap<String, usize> {
    let mut frequency = HashMap::new();
    for word in words {
        *frequency.entry(word.as_ref().to_lowercase()).or_insert(0) += 1;
    }
    frequency
}

/// Distinct lowercased words in the order they first appear.
pub fn first_seen_order<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .iter()
        .map(|w| w.as_ref().to_lowercase())
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Repeated words sorted by count descending; ties keep first-seen order.
pub fn find_repetitions<S: AsRef<str>>(
    words: &[S],
    frequency: &HashMap<String, usize>,
    language: Language,
) -> Vec<Repetition> {
    let mut repetitions: Vec<Repetition> = first_seen_order(words)
        .into_iter()
        .filter_map(|word| {
            let count = frequency.get(&word).copied().unwrap_or(0);
            let qualifies = count > REPETITION_MIN_COUNT
                && word.chars().count() > REPETITION_MIN_LENGTH
                && !is_stop_word(&word, language);
            qualifies.then_some(Repetition { word, count })
        })
        .collect();
    // sort_by is stable
    repetitions.sort_by(|a, b| b.count.cmp(&a.count));
    repetitions
}
