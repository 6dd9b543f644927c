//! Models command - list models available to the API key.

use anyhow::Result;
use promptprobe_store::Config;

use super::build_prober;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Runs the models command.
///
/// Listing failures print an empty list rather than an error.
pub async fn run(config: &Config, cli: &Cli) -> Result<()> {
    let prober = build_prober(config).await?;
    let models = prober.list_models().await;

    match cli.format {
        OutputFormat::Text => println!("{}", cli.text_formatter().format_models(&models)),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_models(&models)?);
        }
    }

    Ok(())
}
