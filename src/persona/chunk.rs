//! Text chunking and prompt framing for persona reviews.
//!
//! Long documents are split into fixed-size character chunks. Each chunk is
//! sent as its own completion call carrying a `[PART i/N]` framing line, and
//! the per-chunk answers are joined into one labelled report.

use crate::language::Language;

/// Default chunk budget in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 12_000;

const SINGLE_TEMPLATE: &str = include_str!("prompts/single.txt");
const CHUNK_TEMPLATE: &str = include_str!("prompts/chunk.txt");
const LANGUAGE_TEMPLATE: &str = include_str!("prompts/language.txt");

/// Split `text` into consecutive pieces of at most `size` characters.
///
/// Splits on `char` boundaries, never inside a code point. A `size` of zero
/// is treated as one.
pub fn split_into_chunks(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

/// User prompt for chunk `part` (1-based) out of `total`.
pub fn build_user_prompt(chunk: &str, part: usize, total: usize) -> String {
    if total > 1 {
        CHUNK_TEMPLATE
            .replace("{part}", &part.to_string())
            .replace("{total}", &total.to_string())
            .replace("{chunk}", chunk)
    } else {
        SINGLE_TEMPLATE.replace("{chunk}", chunk)
    }
}

/// Persona system prompt, with an output-language instruction when one is set.
pub fn build_system_prompt(persona_prompt: &str, output_language: Option<Language>) -> String {
    match output_language {
        Some(lang) => {
            let mut prompt = persona_prompt.to_string();
            prompt.push_str(&LANGUAGE_TEMPLATE.replace("{language}", lang.display_name()));
            prompt
        }
        None => persona_prompt.to_string(),
    }
}

/// Join per-chunk answers. A single answer is returned unchanged.
pub fn combine_parts(parts: &[String]) -> String {
    if parts.len() == 1 {
        return parts[0].clone();
    }
    let body = parts
        .iter()
        .enumerate()
        .map(|(i, analysis)| format!("### Part {} analysis\n{}", i + 1, analysis))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");
    format!(
        "**Note:** This text was analyzed in {} parts.\n\n{}",
        parts.len(),
        body
    )
}
