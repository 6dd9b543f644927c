//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use promptprobe_store::{Config, CredentialSourceKind};
use std::path::Path;
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show the configuration file path.
    Path,

    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Reset to defaults by removing the configuration file.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, path: &Path) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, path).await,
        ConfigAction::Path => show_path(cli, path),
        ConfigAction::Init { force } => init_config(path, *force).await,
        ConfigAction::Reset => reset_config(path).await,
    }
}

async fn show_config(cli: &Cli, path: &Path) -> Result<()> {
    let config = Config::load_from(path).await?;

    match cli.format {
        OutputFormat::Text => {
            let source = match config.credential.source {
                CredentialSourceKind::Env => "environment",
                CredentialSourceKind::Keychain => "keychain",
            };

            println!("promptprobe Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Templates:");
            for template in &config.upstream.templates {
                println!("  • {template}");
            }
            println!("Models:");
            for model in &config.upstream.models {
                println!("  • {model}");
            }
            println!();
            println!("Credential:      {} ({source})", config.credential.name);
            println!("Attempt timeout: {}s", config.probe.attempt_timeout_secs);
            match config.probe.deadline_secs {
                Some(secs) => println!("Deadline:        {secs}s"),
                None => println!("Deadline:        none"),
            }
            println!(
                "Preamble:        {}",
                config.probe.preamble.as_deref().unwrap_or("none")
            );
            println!(
                "Generation:      temperature {} · max tokens {} · top-p {} · top-k {}",
                config.generation.temperature,
                config.generation.max_output_tokens,
                config.generation.top_p,
                config.generation.top_k
            );
            println!("Log level:       {}", config.general.log_level);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }

    Ok(())
}

fn show_path(cli: &Cli, path: &Path) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let state = if path.exists() { "" } else { " (not created)" };
            println!("{}{state}", path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_file": path.display().to_string(),
                "exists": path.exists(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(path).await?;

    info!(path = %path.display(), "Configuration initialized");
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}

async fn reset_config(path: &Path) -> Result<()> {
    if path.exists() {
        tokio::fs::remove_file(path).await?;
        info!(path = %path.display(), "Configuration reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
