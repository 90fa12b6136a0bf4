//! SmartWrite - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use smartwrite::cli::{Cli, Commands, ConfigCommands, PersonaCommands};

/// Environment variable holding the log filter, e.g. `SMARTWRITE_LOG=smartwrite=debug`.
const LOG_ENV: &str = "SMARTWRITE_LOG";

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("smartwrite=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            files,
            language,
            json,
        } => commands::analyze::handle(config_path, &files, language, json),
        Commands::Review {
            file,
            persona,
            all,
            output,
            stdout,
            language,
            quick,
        } => commands::review::handle(
            config_path,
            commands::review::ReviewArgs {
                file: file.as_deref(),
                persona: persona.as_deref(),
                all,
                output: &output,
                stdout,
                language,
                quick,
            },
        ),
        Commands::Translate {
            file,
            to,
            from,
            output,
            stdout,
        } => commands::translate::handle(config_path, file.as_deref(), to, from, &output, stdout),
        Commands::Personas(cmd) => match cmd {
            PersonaCommands::List { enabled } => commands::personas::handle_list(config_path, enabled),
            PersonaCommands::Show { id } => commands::personas::handle_show(config_path, &id),
            PersonaCommands::Add {
                id,
                name,
                prompt,
                description,
                icon,
            } => commands::personas::handle_add(config_path, id, name, prompt, description, icon),
            PersonaCommands::Enable { id } => {
                commands::personas::handle_toggle(config_path, &id, true)
            }
            PersonaCommands::Disable { id } => {
                commands::personas::handle_toggle(config_path, &id, false)
            }
        },
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config_path),
            ConfigCommands::Path => commands::config::handle_path(config_path),
            ConfigCommands::Set { key, value } => {
                commands::config::handle_set(config_path, &key, &value)
            }
            ConfigCommands::Init { force } => commands::config::handle_init(config_path, force),
        },
        Commands::Models => commands::models::handle(config_path),
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}
