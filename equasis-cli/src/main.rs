// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Equasis CLI - vessel, fleet, and name lookups from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Store the account once (the password goes to the system keychain)
//! equasis configure --setup ops@example.com
//!
//! # One vessel, or several
//! equasis vessel --imo 9074729
//! equasis vessel --imo 9074729 9321483 --progress
//!
//! # Vessels listed in a file, stop at the first failure
//! equasis vessel --imo-file fleet.txt --stop-on-error
//!
//! # A company's fleet as CSV
//! equasis --format csv fleet --company "MAERSK A/S"
//!
//! # Name search as JSON
//! equasis --format json search --name "EMMA MAERSK"
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{configure, fleet, search, vessel};

// ============================================================================
// CLI Definition
// ============================================================================

/// Equasis CLI - vessel and fleet profiles from Equasis.
#[derive(Parser)]
#[command(name = "equasis")]
#[command(about = "Vessel and fleet profiles from Equasis")]
#[command(long_about = r"
Retrieves vessel profiles (ship info, inspections, history), company fleets,
and name search results from Equasis. An Equasis account is required.

Credentials are taken from, in order:
  --username/--password
  EQUASIS_USERNAME and EQUASIS_PASSWORD
  the configured username and its password in the system keychain

Examples:
  equasis configure --setup ops@example.com
  equasis vessel --imo 9074729
  equasis --format json fleet --company 'MAERSK A/S'
  equasis search --name 'EMMA MAERSK'
")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Equasis username.
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Equasis password.
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Output format.
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout.
    #[arg(long, short = 'o', global = true)]
    pub output_file: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Retrieve vessel profiles by IMO number.
    #[command(visible_alias = "v")]
    Vessel(vessel::VesselArgs),

    /// Retrieve the fleets of companies.
    #[command(visible_alias = "f")]
    Fleet(fleet::FleetArgs),

    /// Search vessels by name.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Manage the stored account.
    Configure(configure::ConfigureArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
    /// Comma-separated values.
    Csv,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Credentials missing or rejected.
    Credentials = 2,
    /// Entity not found.
    NotFound = 3,
    /// Some keys of a batch failed.
    PartialFailure = 4,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("equasis=debug,info")
    } else {
        EnvFilter::new("equasis=warn")
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
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result: Result<ExitCode> = match &cli.command {
        Commands::Vessel(args) => vessel::run(args, &cli).await,
        Commands::Fleet(args) => fleet::run(args, &cli).await,
        Commands::Search(args) => search::run(args, &cli).await,
        Commands::Configure(args) => configure::run(args, &cli).await,
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            commands::exit_code_for_error(&e)
        }
    };

    std::process::exit(code as i32);
}
