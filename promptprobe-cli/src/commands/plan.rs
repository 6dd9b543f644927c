//! Plan command - show the candidate order.

use anyhow::Result;
use promptprobe_store::Config;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Runs the plan command. Never contacts upstream or reads the key.
pub fn run(config: &Config, cli: &Cli) -> Result<()> {
    let plan = config.plan()?;

    match cli.format {
        OutputFormat::Text => println!("{}", cli.text_formatter().format_plan(&plan)),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_plan(&plan)?);
        }
    }

    Ok(())
}
