//! In-place edits of the config file that keep comments and layout.

use anyhow::{bail, Context, Result};
use toml_edit::{value, DocumentMut, Item, Table, Value};

use super::types::Config;

/// Set `section.key` to `raw` in the TOML text `content`.
///
/// `raw` is read as a TOML value when it parses as one (`true`, `250`,
/// `["a", "b"]`) and as a plain string otherwise. The edited document must
/// still deserialize into a valid [`Config`]. Returns the new text.
pub fn set_value(content: &str, key: &str, raw: &str) -> Result<String> {
    let (section, field) = key
        .split_once('.')
        .with_context(|| format!("Key '{}' must look like 'section.field'", key))?;
    if !matches!(section, "analysis" | "llm" | "personas") {
        bail!(
            "Unknown section '{}'. Valid: analysis, llm, personas",
            section
        );
    }
    if field.is_empty() || field.contains('.') {
        bail!("Key '{}' must look like 'section.field'", key);
    }

    let mut doc: DocumentMut = content.parse().context("Failed to parse config file")?;
    let table = doc
        .entry(section)
        .or_insert_with(|| Item::Table(Table::new()))
        .as_table_mut()
        .with_context(|| format!("[{}] is not a table", section))?;

    let parsed = raw
        .parse::<Value>()
        .unwrap_or_else(|_| Value::from(raw));
    table.insert(field, value(parsed));

    let edited = doc.to_string();
    let config: Config = toml::from_str(&edited)
        .with_context(|| format!("'{}' is not a valid value for {}", raw, key))?;
    if !known_field(&config, section, field) {
        bail!("Unknown key '{}'", key);
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
    Ok(edited)
}

/// Whether `section.field` exists in the serialized config.
fn known_field(config: &Config, section: &str, field: &str) -> bool {
    let Ok(serialized) = toml::Value::try_from(config) else {
        return false;
    };
    serialized
        .get(section)
        .and_then(|s| s.as_table())
        .is_some_and(|t| t.contains_key(field))
}
