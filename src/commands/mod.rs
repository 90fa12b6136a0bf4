//! Command handlers for the SmartWrite CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod analyze;
pub mod completions;
pub mod config;
pub mod models;
pub mod personas;
pub mod review;
pub mod translate;

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use smartwrite::llm::{CompletionBackend, OllamaBackend};
use smartwrite::Config;

/// Load the config from `path` (or the default location) and return it with
/// the resolved path.
pub fn load_config(path: Option<&Path>) -> Result<(Config, PathBuf)> {
    let path = Config::resolve_path(path)?;
    let config = Config::load_from(&path)?;
    Ok((config, path))
}

/// Document text and a title for reports.
pub struct Input {
    pub text: String,
    pub title: String,
}

/// Read `file`, or standard input when no file is given.
pub fn read_input(file: Option<&Path>) -> Result<Input> {
    match file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Untitled".to_string());
            Ok(Input { text, title })
        }
        None => {
            if atty::is(atty::Stream::Stdin) {
                bail!("No input: pass a file or pipe text on standard input");
            }
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read standard input")?;
            Ok(Input {
                text,
                title: "stdin".to_string(),
            })
        }
    }
}

/// Ollama backend from the `[llm]` section.
pub fn build_backend(config: &Config) -> Result<Arc<dyn CompletionBackend>> {
    let backend = OllamaBackend::new(config.ollama_settings())
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
    Ok(Arc::new(backend))
}

/// Fail early with a hint when the integration is switched off.
pub fn require_enabled(config: &Config) -> Result<()> {
    if !config.llm.enabled {
        bail!(
            "Ollama is disabled in settings.\nHint: run 'smartwrite config set llm.enabled true'"
        );
    }
    Ok(())
}

/// Fail early when the server does not answer, instead of on the first chunk.
pub fn require_available(backend: &dyn CompletionBackend, config: &Config) -> Result<()> {
    if !backend.is_available() {
        bail!(
            "Cannot reach {} at {}\nHint: start the server or run 'smartwrite config set llm.endpoint <url>'",
            backend.name(),
            config.llm.endpoint
        );
    }
    Ok(())
}

/// Write `content` to `dir/name`, creating `dir`. Returns the written path.
pub fn write_document(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Truncate to `max_width` terminal columns, adding an ellipsis if needed.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    if max_width > 3 {
        out.push_str("...");
    }
    out
}

/// Pad `s` with spaces to `width` terminal columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(pad))
}
