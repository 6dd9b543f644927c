//! Check command - verify the credential and upstream reachability.

use anyhow::Result;
use promptprobe_store::Config;
use tracing::warn;

use super::build_prober;
use crate::output::{CheckOutput, JsonFormatter};
use crate::{Cli, OutputFormat};

/// Runs the check command.
///
/// Upstream counts as reachable when model discovery returns at least one
/// model.
pub async fn run(config: &Config, cli: &Cli) -> Result<()> {
    let credential = config.credential.name.clone();

    let (credential_loaded, models, error) = match build_prober(config).await {
        Ok(prober) => (true, prober.list_models().await, None),
        Err(e) => {
            warn!(error = %e, "Prober could not be built");
            (false, Vec::new(), Some(e))
        }
    };
    let reachable = !models.is_empty();

    match cli.format {
        OutputFormat::Text => {
            let formatter = cli.text_formatter();
            let credential_detail = match &error {
                Some(e) => format!("{credential}: {e}"),
                None => credential.clone(),
            };
            println!("{}", formatter.format_check("credential", credential_loaded, &credential_detail));
            if credential_loaded {
                let detail = if reachable {
                    format!("{} models", models.len())
                } else {
                    "unreachable".to_string()
                };
                println!("{}", formatter.format_check("upstream", reachable, &detail));
            }
        }
        OutputFormat::Json => {
            let output = CheckOutput {
                credential,
                credential_loaded,
                reachable,
                models: models.len(),
                error: error.as_ref().map(ToString::to_string),
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    match error {
        Some(e) => Err(e),
        None if !reachable => anyhow::bail!("Upstream is unreachable"),
        None => Ok(()),
    }
}
