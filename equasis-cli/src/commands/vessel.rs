//! Vessel command - collect vessel profiles by IMO number.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use equasis_collect::{BatchOptions, NoProgress, ProgressSink, VesselCollector, run_batch};
use tracing::info;

use super::{
    ProgressPrinter, batch_mode, emit, exit_code_for_run, open_session, read_keys, use_colors,
};
use crate::output::{CsvFormatter, JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the vessel command.
#[derive(Args)]
pub struct VesselArgs {
    /// IMO number(s).
    #[arg(long, num_args = 1.., required_unless_present = "imo_file")]
    pub imo: Vec<String>,

    /// File with one IMO number per line.
    #[arg(long)]
    pub imo_file: Option<PathBuf>,

    /// Stop at the first failed vessel.
    #[arg(long)]
    pub stop_on_error: bool,

    /// Print per-vessel progress to stderr.
    #[arg(long)]
    pub progress: bool,
}

/// Runs the vessel command.
pub async fn run(args: &VesselArgs, cli: &Cli) -> Result<ExitCode> {
    let keys = read_keys(&args.imo, args.imo_file.as_deref()).await?;
    let (mut gateway, config) = open_session(cli).await?;

    let collector = VesselCollector::from_settings(gateway.settings());
    let options = BatchOptions::from_settings(gateway.settings())
        .with_mode(batch_mode(args.stop_on_error, &config));

    info!(vessels = keys.len(), "Collecting vessels");
    if args.progress && !cli.quiet && keys.len() > 1 {
        eprintln!("Processing {} vessels...", keys.len());
    }

    let mut printer = ProgressPrinter::new("IMO");
    let mut silent = NoProgress;
    let progress: &mut dyn ProgressSink = if args.progress && !cli.quiet {
        &mut printer
    } else {
        &mut silent
    };

    let run = run_batch(&collector, &mut gateway, &keys, &options, progress).await;
    gateway.logout()?;

    let rendered = match cli.format {
        OutputFormat::Text => TextFormatter::new(use_colors(cli)).format_vessel_run(&run),
        OutputFormat::Json => JsonFormatter::new(true).format_run(&run)?,
        OutputFormat::Csv => CsvFormatter::new().format_vessel_outcomes(&run.outcomes),
    };
    emit(cli, &rendered).await?;

    Ok(exit_code_for_run(&run))
}
