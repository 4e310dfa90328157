//! Fleet command - list the vessels of companies.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use equasis_collect::{BatchOptions, FleetCollector, NoProgress, ProgressSink, run_batch};
use tracing::info;

use super::{
    ProgressPrinter, batch_mode, emit, exit_code_for_run, open_session, read_keys, use_colors,
};
use crate::output::{CsvFormatter, JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the fleet command.
#[derive(Args)]
pub struct FleetArgs {
    /// Company name(s).
    #[arg(long, num_args = 1.., required_unless_present = "company_file")]
    pub company: Vec<String>,

    /// File with one company name per line.
    #[arg(long)]
    pub company_file: Option<PathBuf>,

    /// Stop at the first failed company.
    #[arg(long)]
    pub stop_on_error: bool,

    /// Print per-company progress to stderr.
    #[arg(long)]
    pub progress: bool,
}

/// Runs the fleet command.
pub async fn run(args: &FleetArgs, cli: &Cli) -> Result<ExitCode> {
    let keys = read_keys(&args.company, args.company_file.as_deref()).await?;
    let (mut gateway, config) = open_session(cli).await?;

    let options = BatchOptions::from_settings(gateway.settings())
        .with_mode(batch_mode(args.stop_on_error, &config));

    info!(companies = keys.len(), "Collecting fleets");

    let mut printer = ProgressPrinter::new("company");
    let mut silent = NoProgress;
    let progress: &mut dyn ProgressSink = if args.progress && !cli.quiet {
        &mut printer
    } else {
        &mut silent
    };

    let run = run_batch(&FleetCollector::new(), &mut gateway, &keys, &options, progress).await;
    gateway.logout()?;

    let rendered = match cli.format {
        OutputFormat::Text => TextFormatter::new(use_colors(cli)).format_fleet_run(&run),
        OutputFormat::Json => JsonFormatter::new(true).format_run(&run)?,
        OutputFormat::Csv => CsvFormatter::new().format_fleet_outcomes(&run.outcomes),
    };
    emit(cli, &rendered).await?;

    Ok(exit_code_for_run(&run))
}
