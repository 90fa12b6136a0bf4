//! Config subcommands handler

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use smartwrite::config::set_value;
use smartwrite::Config;

use super::load_config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config_path: Option<&Path>) -> Result<()> {
    let (config, _) = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

#[cfg(not(tarpaulin_include))]
pub fn handle_path(config_path: Option<&Path>) -> Result<()> {
    println!("{}", Config::resolve_path(config_path)?.display());
    Ok(())
}

/// Set one `section.field` value, keeping the rest of the file as written.
#[cfg(not(tarpaulin_include))]
pub fn handle_set(config_path: Option<&Path>, key: &str, raw: &str) -> Result<()> {
    let path = Config::resolve_path(config_path)?;
    let content = if path.exists() {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?
    } else {
        String::new()
    };

    let updated = set_value(&content, key, raw)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }
    fs::write(&path, updated)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;
    println!("Set {} = {}", key, raw);
    Ok(())
}

/// Write the default configuration.
#[cfg(not(tarpaulin_include))]
pub fn handle_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = Config::resolve_path(config_path)?;
    if path.exists() && !force {
        bail!(
            "Config file already exists: {}\nHint: use --force to overwrite",
            path.display()
        );
    }
    Config::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
