//! Review command handler
//!
//! Sends the document to one persona (or every enabled persona) through the
//! orchestrator and writes the markdown review. Ctrl-C cancels the running
//! review; a fan-out keeps the personas finished before the cancellation.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;

use smartwrite::persona::report;
use smartwrite::{AnalysisOutcome, AnalysisRequest, LanguageSetting, PersonaOrchestrator};

use super::{
    build_backend, load_config, read_input, require_available, require_enabled, write_document,
};

pub struct ReviewArgs<'a> {
    pub file: Option<&'a Path>,
    pub persona: Option<&'a str>,
    pub all: bool,
    pub output: &'a Path,
    pub stdout: bool,
    pub language: Option<LanguageSetting>,
    pub quick: bool,
}

#[cfg(not(tarpaulin_include))]
pub fn handle(config_path: Option<&Path>, args: ReviewArgs<'_>) -> Result<()> {
    let (config, _) = load_config(config_path)?;
    require_enabled(&config)?;
    let input = read_input(args.file)?;
    if input.text.trim().is_empty() {
        bail!("No text to analyze");
    }

    let backend = build_backend(&config)?;
    require_available(backend.as_ref(), &config)?;
    let orchestrator = Arc::new(PersonaOrchestrator::new(
        backend,
        config.persona_catalog(),
        config.orchestrator_settings(),
    ));
    {
        let orchestrator = Arc::clone(&orchestrator);
        ctrlc::set_handler(move || {
            eprintln!("\nCancelling...");
            orchestrator.cancel_analysis();
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let persona_id = args.persona.unwrap_or(&config.personas.selected);

    if args.quick {
        return match orchestrator.quick_feedback(persona_id, &input.text, args.language) {
            Some(feedback) => {
                println!("{}", feedback);
                Ok(())
            }
            None => bail!("No quick feedback available (unknown persona or request failed)"),
        };
    }

    let results = if args.all {
        let on_persona = |index: usize, total: usize, name: &str| {
            eprintln!("Analyzing ({}/{}): {}...", index, total, name);
        };
        let fan_out = orchestrator.analyze_all(&input.text, args.language, Some(&on_persona));
        if fan_out.cancelled {
            if fan_out.results.is_empty() {
                bail!("Analysis cancelled by user");
            }
            eprintln!(
                "Cancelled; saving {} finished review(s)",
                fan_out.results.len()
            );
        }
        fan_out.results
    } else {
        let mut request = AnalysisRequest::new(persona_id, input.text.as_str());
        request.language = args.language;
        let on_progress = |message: &str, percent: u8| {
            eprint!("\r{} ({}%)   ", message, percent);
            let _ = io::stderr().flush();
        };
        let outcome = orchestrator.analyze_text(request, Some(&on_progress));
        eprintln!();
        let result = match outcome {
            AnalysisOutcome::Completed(result) => result,
            AnalysisOutcome::Busy { persona_name } => {
                bail!("Another analysis ({}) is running", persona_name)
            }
        };
        if let Some(error) = &result.error {
            bail!("Analysis failed: {}", error);
        }
        vec![result]
    };

    let now = Local::now().naive_local();
    let document = report::render_markdown(&input.title, &results, now);
    if args.stdout {
        println!("{}", document);
    } else {
        let path = write_document(args.output, &report::file_name(&results, now), &document)?;
        println!("Analysis saved to: {}", path.display());
    }
    Ok(())
}
