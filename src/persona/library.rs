//! Built-in persona catalog, embedded at compile time.

use once_cell::sync::Lazy;
use serde::Deserialize;

use super::Persona;

const BUILTIN_TABLE: &str = include_str!("builtin.toml");

#[derive(Deserialize)]
struct BuiltinTable {
    base: String,
    persona: Vec<BuiltinEntry>,
}

#[derive(Deserialize)]
struct BuiltinEntry {
    id: String,
    name: String,
    description: String,
    icon: String,
    prompt: String,
}

static BUILTIN: Lazy<Vec<Persona>> = Lazy::new(|| {
    let table: BuiltinTable =
        toml::from_str(BUILTIN_TABLE).expect("embedded persona table is valid TOML");
    table
        .persona
        .into_iter()
        .map(|entry| Persona {
            id: entry.id,
            name: entry.name,
            description: entry.description,
            system_prompt: format!("{}\n\n{}", table.base, entry.prompt),
            icon: entry.icon,
        })
        .collect()
});

/// Default persona for single-persona reviews.
pub const DEFAULT_PERSONA_ID: &str = "critical-editor";

/// Built-in personas in display order.
pub fn builtin_personas() -> &'static [Persona] {
    &BUILTIN
}

/// Ids of every built-in persona, in display order.
pub fn builtin_ids() -> Vec<String> {
    BUILTIN.iter().map(|p| p.id.clone()).collect()
}
