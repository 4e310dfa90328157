//! Configure command - store, clear, or inspect the account.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use equasis_store::{Config, CredentialProvider, PASSWORD_ENV};
use tracing::info;

use super::{emit, use_colors};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the configure command.
#[derive(Args)]
#[command(group(ArgGroup::new("action").required(true).args(["setup", "clear", "show"])))]
pub struct ConfigureArgs {
    /// Store USERNAME in the config file and its password in the keychain.
    #[arg(long, value_name = "USERNAME")]
    pub setup: Option<String>,

    /// Remove the stored username and password.
    #[arg(long)]
    pub clear: bool,

    /// Show which credential sources are present.
    #[arg(long)]
    pub show: bool,
}

/// Runs the configure command.
pub async fn run(args: &ConfigureArgs, cli: &Cli) -> Result<ExitCode> {
    let provider = CredentialProvider::system();
    let mut config = Config::load().await.context("failed to load configuration")?;

    if let Some(username) = &args.setup {
        setup(&provider, &mut config, username.trim(), cli).await
    } else if args.clear {
        clear(&provider, &mut config, cli).await
    } else {
        show(&provider, &config, cli).await
    }
}

async fn setup(
    provider: &CredentialProvider,
    config: &mut Config,
    username: &str,
    cli: &Cli,
) -> Result<ExitCode> {
    if username.is_empty() {
        anyhow::bail!("username must not be empty");
    }

    let password = match cli.password.clone().or_else(|| std::env::var(PASSWORD_ENV).ok()) {
        Some(password) => password,
        None => prompt_password(username)?,
    };

    provider.store_password(username, &password)?;
    config.username = Some(username.to_string());
    config.save().await?;

    info!("Account configured");
    if !cli.quiet {
        println!("✓ Credentials stored for {username}");
    }
    Ok(ExitCode::Success)
}

async fn clear(provider: &CredentialProvider, config: &mut Config, cli: &Cli) -> Result<ExitCode> {
    let Some(username) = config.username.take().or_else(|| cli.username.clone()) else {
        if !cli.quiet {
            println!("No stored credentials");
        }
        return Ok(ExitCode::Success);
    };

    provider.delete_password(&username)?;
    config.save().await?;

    info!("Account cleared");
    if !cli.quiet {
        println!("✓ Stored credentials cleared");
    }
    Ok(ExitCode::Success)
}

async fn show(provider: &CredentialProvider, config: &Config, cli: &Cli) -> Result<ExitCode> {
    let report = provider.describe_sources(config.username.as_deref());
    let path = Config::default_path();

    let rendered = match cli.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "config_file": path.display().to_string(),
                "config_exists": path.exists(),
                "env_username": report.env_username,
                "env_password": report.env_password,
                "configured_username": report.configured_username,
                "keychain_password": report.keychain_password,
                "effective_source": report.effective_source().map(|s| s.to_string()),
            });
            JsonFormatter::new(true).format(&value)?
        }
        OutputFormat::Text | OutputFormat::Csv => {
            TextFormatter::new(use_colors(cli)).format_credential_report(&report, &path)
        }
    };
    emit(cli, &rendered).await?;
    Ok(ExitCode::Success)
}

/// Reads a password line from stdin.
fn prompt_password(username: &str) -> Result<String> {
    eprint!("Equasis password for {username}: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    Ok(password)
}
