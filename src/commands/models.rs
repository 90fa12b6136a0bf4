//! Models command handler

use std::path::Path;

use anyhow::{bail, Result};

use smartwrite::llm::OllamaBackend;

use super::load_config;

/// List the models installed on the server, marking the configured one.
#[cfg(not(tarpaulin_include))]
pub fn handle(config_path: Option<&Path>) -> Result<()> {
    let (config, _) = load_config(config_path)?;
    let backend = OllamaBackend::new(config.ollama_settings())
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
    let models = match backend.list_models() {
        Ok(models) => models,
        Err(e) => bail!(
            "Cannot reach Ollama at {}: {}\nHint: start the server or run 'smartwrite config set llm.endpoint <url>'",
            config.llm.endpoint,
            e
        ),
    };

    print!("{}", render_models(&models, &config.llm.model));
    if !models.iter().any(|m| is_same_model(m, &config.llm.model)) {
        eprintln!(
            "Configured model '{}' is not installed.\nHint: ollama pull {}",
            config.llm.model, config.llm.model
        );
    }
    if !config.llm.enabled {
        eprintln!("Note: Ollama is disabled in settings (llm.enabled = false)");
    }
    Ok(())
}

/// One model per line, `*` in front of the configured model.
pub fn render_models(models: &[String], configured: &str) -> String {
    if models.is_empty() {
        return "No models installed.\n".to_string();
    }
    models
        .iter()
        .map(|m| {
            let marker = if is_same_model(m, configured) { '*' } else { ' ' };
            format!("{} {}\n", marker, m)
        })
        .collect()
}

/// Ollama reports untagged models as `name:latest`.
fn is_same_model(installed: &str, configured: &str) -> bool {
    installed == configured
        || (!configured.contains(':') && installed.strip_suffix(":latest") == Some(configured))
}
