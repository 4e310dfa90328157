//! Search command - find vessels by name.

use anyhow::Result;
use clap::Args;
use equasis_collect::search_by_name;

use super::{emit, open_session, use_colors};
use crate::output::{CsvFormatter, JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Vessel name, or part of it.
    #[arg(long)]
    pub name: String,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<ExitCode> {
    let (mut gateway, _config) = open_session(cli).await?;
    let vessels = search_by_name(&mut gateway, &args.name).await?;
    gateway.logout()?;

    let rendered = match cli.format {
        OutputFormat::Text => {
            TextFormatter::new(use_colors(cli)).format_search(&args.name, &vessels)
        }
        OutputFormat::Json => JsonFormatter::new(true).format(&vessels)?,
        OutputFormat::Csv => CsvFormatter::new().format_vessel_list(&vessels),
    };
    emit(cli, &rendered).await?;

    Ok(if vessels.is_empty() {
        ExitCode::NotFound
    } else {
        ExitCode::Success
    })
}
