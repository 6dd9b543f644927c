//! Ask command - probe the candidates with a question.

use anyhow::Result;
use clap::Args;
use promptprobe_core::ProbeRequest;
use promptprobe_store::Config;
use tracing::{debug, info};

use super::build_prober;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the ask command.
#[derive(Args)]
pub struct AskArgs {
    /// The question. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Instruction text placed before the question (overrides config).
    #[arg(long)]
    pub preamble: Option<String>,

    /// Give up on the whole probe after this many seconds.
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Try only this model (repeatable, overrides config).
    #[arg(long = "model", short)]
    pub models: Vec<String>,
}

impl AskArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &Config) -> Result<Config> {
        let mut config = config.clone();
        if let Some(preamble) = &self.preamble {
            config.probe.preamble = Some(preamble.clone());
        }
        if let Some(deadline) = self.deadline {
            config.probe.deadline_secs = Some(deadline);
        }
        if !self.models.is_empty() {
            config.upstream.models.clone_from(&self.models);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Runs the ask command.
pub async fn run(args: &AskArgs, config: &Config, cli: &Cli) -> Result<()> {
    let request = ProbeRequest::new(args.question.join(" "));
    if request.is_blank() {
        anyhow::bail!("Question must not be empty");
    }

    let config = args.apply(config)?;
    let prober = build_prober(&config).await?;

    info!(candidates = prober.plan().len(), "Asking");

    let outcome = prober.execute(&request).await;

    debug!(
        success = outcome.is_success(),
        attempts = outcome.attempts_count(),
        duration_ms = outcome.duration.as_millis(),
        "Probe finished"
    );

    match cli.format {
        OutputFormat::Text => {
            if let Ok(answer) = &outcome.result {
                let formatter = cli.text_formatter();
                println!(
                    "{}",
                    formatter.format_answer(answer, outcome.attempts_count(), outcome.duration)
                );
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_answer(&request.question, &outcome)?);
        }
    }

    outcome.result.map(|_| ()).map_err(anyhow::Error::from)
}
