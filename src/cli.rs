//! CLI definitions for SmartWrite
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for documentation generation (man pages, markdown).

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use clap_complete::Shell as CompletionShell;
use std::path::PathBuf;

use crate::language::{Language, LanguageSetting};

/// Build clap styles.
///
/// - Green: headers, usage, command names
/// - White: placeholders and valid values
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "smartwrite")]
#[command(about = "[ SmartWrite ] - writing metrics, readability and persona feedback for your drafts")]
#[command(
    long_about = "SmartWrite - analyze prose locally and get feedback from LLM personas.

Local analysis counts words, sentences and syllables, scores readability
with six formulas, and flags repetitions, passive voice, cliches, long
sentences, complex words and wordy phrasing. Persona reviews send the
text to a local Ollama server with one of twenty reviewer prompts.

QUICK START:
    smartwrite analyze draft.md              Metrics, readability and suggestions
    smartwrite config set llm.enabled true   Allow persona reviews
    smartwrite review draft.md               Review with the selected persona
    smartwrite review draft.md --all         Review with every enabled persona
    smartwrite translate draft.md --to pt    Translate a document

Text is read from standard input when no file is given."
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Use this config file instead of ~/.config/smartwrite/config.toml
    #[arg(long, global = true, env = "SMARTWRITE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze text locally: metrics, readability and suggestions
    #[command(long_about = "Analyze one or more documents without any network access.

Prints word, sentence and paragraph counts, reading time, the six
readability scores with an overall level, and style suggestions with
character offsets. Several files are analyzed in parallel.

EXAMPLES:
    smartwrite analyze chapter1.md chapter2.md
    smartwrite analyze draft.md --language pt
    cat draft.md | smartwrite analyze --json")]
    Analyze {
        /// Files to analyze (standard input when omitted)
        files: Vec<PathBuf>,
        /// Document language: auto, en, pt, es, fr, de
        #[arg(long, short)]
        language: Option<LanguageSetting>,
        /// Print JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Get feedback on a document from one or all personas
    #[command(long_about = "Send a document to the configured Ollama model with a persona prompt.

Long documents are split into parts and each part is reviewed in turn.
The review is written as a markdown document into the output directory
(or printed with --stdout). Press Ctrl-C to cancel a running review;
with --all the personas finished so far are still saved.

EXAMPLES:
    smartwrite review draft.md
    smartwrite review draft.md --persona ghostwriter
    smartwrite review draft.md --all --output reviews/
    smartwrite review draft.md --language pt --stdout")]
    Review {
        /// Document to review (standard input when omitted)
        file: Option<PathBuf>,
        /// Persona id (defaults to [personas].selected)
        #[arg(long, short, conflicts_with = "all")]
        persona: Option<String>,
        /// Review with every enabled persona
        #[arg(long)]
        all: bool,
        /// Directory for the review document
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
        /// Print the review instead of writing a file
        #[arg(long)]
        stdout: bool,
        /// Language of the feedback (defaults to [llm].output_language)
        #[arg(long, short)]
        language: Option<LanguageSetting>,
        /// Ask for a short 3-point summary of the last part of the text
        #[arg(long, conflicts_with = "all")]
        quick: bool,
    },

    /// Translate a document with the configured model
    #[command(long_about = "Translate a document in parts, carrying a short summary of
each translated part forward so names and terms stay consistent.

EXAMPLES:
    smartwrite translate draft.md --to pt
    smartwrite translate draft.md --to de --from en --output translations/")]
    Translate {
        /// Document to translate (standard input when omitted)
        file: Option<PathBuf>,
        /// Target language: en, pt, es, fr, de
        #[arg(long)]
        to: Language,
        /// Source language (detected when omitted)
        #[arg(long)]
        from: Option<Language>,
        /// Directory for the translated document
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
        /// Print the translation instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Browse and add reviewer personas
    #[command(subcommand)]
    Personas(PersonaCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List models installed on the Ollama server
    #[command(long_about = "Ask the configured Ollama server which models are installed.
The configured model (llm.model) is marked with '*'.

EXAMPLE:
    smartwrite models")]
    Models,

    /// Generate shell completions
    #[command(long_about = "Print a completion script for the given shell.

EXAMPLE:
    smartwrite completions zsh > ~/.zfunc/_smartwrite")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum PersonaCommands {
    /// List personas (enabled ones are marked)
    List {
        /// Only show enabled personas
        #[arg(long)]
        enabled: bool,
    },
    /// Show a persona's description and system prompt
    Show {
        /// Persona id
        id: String,
    },
    /// Add or replace a custom persona
    #[command(long_about = "Add a custom persona to the config file and enable it.

EXAMPLE:
    smartwrite personas add poet --name \"Poet\" --prompt \"Review the rhythm and imagery.\"")]
    Add {
        /// Persona id (lowercase letters, digits and '-')
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// System prompt
        #[arg(long)]
        prompt: String,
        /// Short description
        #[arg(long, default_value = "")]
        description: String,
        /// Icon shown in listings
        #[arg(long, default_value = "🤖")]
        icon: String,
    },
    /// Enable a persona for --all reviews
    Enable {
        /// Persona id
        id: String,
    },
    /// Disable a persona for --all reviews
    Disable {
        /// Persona id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Set a value, keeping comments in the file
    #[command(long_about = "Set one configuration value.

Values are read as TOML when possible (true, 250, [\"a\", \"b\"])
and as plain strings otherwise.

EXAMPLES:
    smartwrite config set llm.enabled true
    smartwrite config set llm.model llama3.2
    smartwrite config set analysis.language pt")]
    Set {
        /// Key as section.field, e.g. llm.model
        key: String,
        /// New value
        value: String,
    },
    /// Write a config file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
