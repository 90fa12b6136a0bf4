//! Personas subcommands handler

use std::path::Path;

use anyhow::{bail, Result};

use smartwrite::persona::Persona;
use smartwrite::PersonaCatalog;

use super::{load_config, pad_to_width, truncate_to_width};

/// Column width reserved for persona icons.
const ICON_WIDTH: usize = 3;
const ID_WIDTH: usize = 20;
const NAME_WIDTH: usize = 22;
const DESCRIPTION_WIDTH: usize = 60;

/// List personas, marking the enabled ones.
#[cfg(not(tarpaulin_include))]
pub fn handle_list(config_path: Option<&Path>, enabled_only: bool) -> Result<()> {
    let (config, _) = load_config(config_path)?;
    let catalog = config.persona_catalog();
    print!(
        "{}",
        render_list(&catalog, enabled_only, &config.personas.selected)
    );
    Ok(())
}

/// One line per persona: marker, icon, id, name, description.
pub fn render_list(catalog: &PersonaCatalog, enabled_only: bool, selected: &str) -> String {
    let mut out = String::new();
    for persona in catalog.list_all_personas() {
        let enabled = catalog.is_enabled(&persona.id);
        if enabled_only && !enabled {
            continue;
        }
        let marker = match (persona.id == selected, enabled) {
            (true, _) => '>',
            (false, true) => '*',
            (false, false) => ' ',
        };
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            marker,
            pad_to_width(&persona.icon, ICON_WIDTH),
            pad_to_width(&persona.id, ID_WIDTH),
            pad_to_width(&truncate_to_width(&persona.name, NAME_WIDTH), NAME_WIDTH),
            truncate_to_width(&persona.description, DESCRIPTION_WIDTH)
        ));
    }
    out
}

/// Print one persona in full.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config_path: Option<&Path>, id: &str) -> Result<()> {
    let (config, _) = load_config(config_path)?;
    let catalog = config.persona_catalog();
    let Some(persona) = catalog.get_persona(id) else {
        bail!(
            "Persona '{}' not found\nHint: run 'smartwrite personas list'",
            id
        );
    };
    println!("{} {} ({})", persona.icon, persona.name, persona.id);
    if !persona.description.is_empty() {
        println!("{}", persona.description);
    }
    println!(
        "Enabled: {}\n\n{}",
        if catalog.is_enabled(id) { "yes" } else { "no" },
        persona.system_prompt
    );
    Ok(())
}

/// Add or replace a custom persona in the config file.
#[cfg(not(tarpaulin_include))]
pub fn handle_add(
    config_path: Option<&Path>,
    id: String,
    name: String,
    prompt: String,
    description: String,
    icon: String,
) -> Result<()> {
    let (mut config, path) = load_config(config_path)?;
    let persona = Persona {
        id,
        name,
        description,
        system_prompt: prompt,
        icon,
    };

    // Run the catalog's checks so built-in ids are refused too
    let mut catalog = config.persona_catalog();
    catalog
        .register_custom_persona(persona.clone())
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let id = persona.id.clone();
    config.upsert_custom_persona(persona);
    config.save_to(&path)?;
    println!("Added persona '{}' to {}", id, path.display());
    Ok(())
}

/// Enable or disable a persona for `review --all`.
#[cfg(not(tarpaulin_include))]
pub fn handle_toggle(config_path: Option<&Path>, id: &str, enable: bool) -> Result<()> {
    let (mut config, path) = load_config(config_path)?;
    if config.persona_catalog().get_persona(id).is_none() {
        bail!("Persona '{}' not found", id);
    }
    let changed = toggle(&mut config.personas.enabled, id, enable);
    if changed {
        config.save_to(&path)?;
    }
    println!(
        "Persona '{}' {}",
        id,
        match (enable, changed) {
            (true, true) => "enabled",
            (false, true) => "disabled",
            (true, false) => "was already enabled",
            (false, false) => "was already disabled",
        }
    );
    Ok(())
}

/// Add or remove `id` from `enabled`. Returns whether the list changed.
fn toggle(enabled: &mut Vec<String>, id: &str, enable: bool) -> bool {
    let present = enabled.iter().any(|e| e == id);
    match (enable, present) {
        (true, false) => {
            enabled.push(id.to_string());
            true
        }
        (false, true) => {
            enabled.retain(|e| e != id);
            true
        }
        _ => false,
    }
}
