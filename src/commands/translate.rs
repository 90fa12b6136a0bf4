//! Translate command handler

use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Local;

use smartwrite::translation::{file_name, render_document, Translator};
use smartwrite::{CancelToken, Language, LanguageSetting};

use super::{
    build_backend, load_config, read_input, require_available, require_enabled, write_document,
};

#[cfg(not(tarpaulin_include))]
pub fn handle(
    config_path: Option<&Path>,
    file: Option<&Path>,
    to: Language,
    from: Option<Language>,
    output: &Path,
    stdout: bool,
) -> Result<()> {
    let (config, _) = load_config(config_path)?;
    require_enabled(&config)?;
    let input = read_input(file)?;
    if input.text.trim().is_empty() {
        bail!("No text to translate");
    }

    let backend = build_backend(&config)?;
    require_available(backend.as_ref(), &config)?;

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            eprintln!("\nCancelling...");
            cancel.cancel();
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let translator = Translator::new(backend, config.llm.translation_chunk_size);
    let source = from.map_or(LanguageSetting::Auto, LanguageSetting::Fixed);
    let on_progress = |message: &str, percent: u8| {
        eprint!("\r{} ({}%)   ", message, percent);
        let _ = io::stderr().flush();
    };
    let result = translator.translate(
        &input.text,
        source,
        LanguageSetting::Fixed(to),
        Some(&on_progress),
        &cancel,
    );
    eprintln!();

    if let Some(error) = &result.error {
        if result.chunks > 0 {
            eprintln!(
                "Partial translation ({} part(s)) before the error:\n{}",
                result.chunks, result.translated_text
            );
        }
        bail!("Translation failed: {}", error);
    }

    let now = Local::now().naive_local();
    let document = render_document(&input.title, to, &result.translated_text, now);
    if stdout {
        println!("{}", document);
    } else {
        let path = write_document(output, &file_name(&input.title, to, now), &document)?;
        println!("Translation saved to: {}", path.display());
    }
    Ok(())
}
