// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! promptprobe CLI - ask a generative-language API with ordered fallback.
//!
//! # Examples
//!
//! ```bash
//! # Ask a question; the first model that answers wins
//! promptprobe ask "What is the derivative of x^2?"
//!
//! # JSON output
//! promptprobe --format json --pretty ask "What is 2 + 2?"
//!
//! # Show the order candidates are tried in
//! promptprobe plan
//!
//! # List models available to the key
//! promptprobe models
//!
//! # Verify the credential and upstream
//! promptprobe check
//! ```

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use promptprobe_fetch::ProbeError;
use promptprobe_store::{default_config_path, Config, StoreError};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ask, check, config, models, plan};
use output::TextFormatter;

// ============================================================================
// CLI Definition
// ============================================================================

/// promptprobe CLI - ordered fallback over endpoints and models.
#[derive(Parser)]
#[command(name = "promptprobe")]
#[command(about = "Ask a generative-language API, falling back across endpoints and models")]
#[command(long_about = r#"
promptprobe sends a question to each (endpoint, model) candidate in order
and prints the first non-empty answer. Endpoints form the outer loop,
models the inner loop.

The API key is read once per run from the environment (GEMINI_API_KEY by
default) or the system keychain, as configured.

Examples:
  promptprobe ask "What is 2 + 2?"      # First answer wins
  promptprobe -f json ask "..."         # JSON output
  promptprobe plan                      # Candidate order, key redacted
  promptprobe models                    # Models available to the key
  promptprobe config init               # Write the default config
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging, no error text).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Path of the configuration file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Returns a text formatter honoring `--no-color`.
    pub fn text_formatter(&self) -> TextFormatter {
        TextFormatter::new(!self.no_color)
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question.
    #[command(visible_alias = "a")]
    Ask(ask::AskArgs),

    /// List models available to the API key.
    #[command(visible_alias = "m")]
    Models,

    /// Show the candidate order without contacting upstream.
    #[command(visible_alias = "p")]
    Plan,

    /// Check the credential and upstream reachability.
    Check,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// Every candidate failed.
    Exhausted = 2,
    /// The API key could not be loaded.
    CredentialMissing = 3,
    /// The probe deadline expired.
    Timeout = 4,
}

impl ExitCode {
    fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<ProbeError>() {
            Some(ProbeError::UpstreamExhausted { .. }) => Self::Exhausted,
            Some(ProbeError::Credential(_)) => Self::CredentialMissing,
            Some(ProbeError::DeadlineExceeded { .. }) => Self::Timeout,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: &str) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("promptprobe=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("promptprobe={level}")))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config_path();

    let loaded = Config::load_from(&config_path).await;
    let level = loaded
        .as_ref()
        .map_or("warn", |c| c.general.log_level.as_str());
    setup_logging(cli.verbose, cli.quiet, level);

    let result = run_command(&cli, &config_path, loaded).await;

    if let Err(e) = result {
        if !cli.quiet {
            match e.downcast_ref::<ProbeError>() {
                Some(probe_error) => {
                    eprintln!("{}", cli.text_formatter().format_probe_error(probe_error));
                }
                None => eprintln!("Error: {e:#}"),
            }
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

/// Dispatches a command. Only `config` runs without a valid config file.
async fn run_command(
    cli: &Cli,
    config_path: &Path,
    loaded: Result<Config, StoreError>,
) -> Result<()> {
    let load = || loaded.with_context(|| format!("Failed to load {}", config_path.display()));

    match &cli.command {
        Commands::Ask(args) => ask::run(args, &load()?, cli).await,
        Commands::Models => models::run(&load()?, cli).await,
        Commands::Plan => plan::run(&load()?, cli),
        Commands::Check => check::run(&load()?, cli).await,
        Commands::Config(args) => config::run(args, cli, config_path).await,
    }
}
