//! CLI command implementations.

pub mod configure;
pub mod fleet;
pub mod search;
pub mod vessel;

use std::io::{IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use equasis_collect::{
    BatchMode, BatchRun, CollectError, ProgressEvent, ProgressPhase, ProgressSink,
};
use equasis_core::{FailureKind, parse_key_list};
use equasis_fetch::{FetchContext, FetchError, SessionGateway};
use equasis_store::{Config, CredentialProvider, ExplicitCredentials};
use thiserror::Error;
use tracing::{debug, info};

use crate::{Cli, ExitCode, OutputFormat};

// ============================================================================
// Session
// ============================================================================

/// No credential source supplied both a username and a password.
#[derive(Debug, Error)]
#[error(
    "no Equasis credentials found. Use one of:\n  \
     equasis configure --setup <USERNAME>\n  \
     EQUASIS_USERNAME and EQUASIS_PASSWORD\n  \
     --username and --password"
)]
pub struct MissingCredentials;

/// Credentials given as global arguments.
pub fn explicit_credentials(cli: &Cli) -> ExplicitCredentials {
    ExplicitCredentials {
        username: cli.username.clone(),
        password: cli.password.clone(),
    }
}

/// Loads the configuration and opens a session with resolved credentials.
///
/// Nothing is sent until the first fetch.
pub async fn open_session(cli: &Cli) -> Result<(SessionGateway, Config)> {
    let config = Config::load().await.context("failed to load configuration")?;

    let resolved = CredentialProvider::system()
        .resolve(&explicit_credentials(cli), config.username.as_deref())
        .ok_or(MissingCredentials)?;
    info!(source = %resolved.source, "Using credentials");

    let context = FetchContext::with_settings(config.to_fetch_settings())?;
    Ok((SessionGateway::new(context, resolved.credentials), config))
}

// ============================================================================
// Keys and Batch Options
// ============================================================================

/// Collects keys from arguments and an optional key file, in that order.
pub async fn read_keys(inline: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut keys: Vec<String> = inline.to_vec();

    if let Some(path) = file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let from_file = parse_key_list(&text);
        debug!(path = %path.display(), keys = from_file.len(), "Read key file");
        keys.extend(from_file);
    }

    if keys.is_empty() {
        anyhow::bail!("no keys given");
    }
    Ok(keys)
}

/// Picks the batch mode from the flag, falling back to the configuration.
pub fn batch_mode(stop_on_error: bool, config: &Config) -> BatchMode {
    if stop_on_error || !config.batch.continue_on_error {
        BatchMode::StopOnFirstError
    } else {
        BatchMode::ContinueOnError
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Prints batch progress lines to stderr.
pub struct ProgressPrinter {
    label: &'static str,
}

impl ProgressPrinter {
    /// Creates a printer; `label` names the key kind ("IMO", "company").
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }

    /// Formats one event.
    pub fn line(&self, event: &ProgressEvent) -> String {
        let prefix = format!("[{}/{}]", event.index, event.total);
        let key = &event.key;
        let label = self.label;
        match event.phase {
            ProgressPhase::Started => format!("{prefix} Processing {label} {key}..."),
            ProgressPhase::Succeeded => format!("{prefix} ✓ {label} {key} retrieved"),
            ProgressPhase::Partial => {
                format!("{prefix} ✓ {label} {key} retrieved (some tabs failed)")
            }
            ProgressPhase::NotFound => format!("{prefix} ⚠ {label} {key} not found"),
            ProgressPhase::Failed => match &event.message {
                Some(message) => format!("{prefix} ✗ {label} {key} error: {message}"),
                None => format!("{prefix} ✗ {label} {key} error"),
            },
        }
    }
}

impl ProgressSink for ProgressPrinter {
    fn on_progress(&mut self, event: &ProgressEvent) {
        eprintln!("{}", self.line(event));
    }
}

// ============================================================================
// Exit Codes
// ============================================================================

fn exit_code_for_kind(kind: FailureKind) -> ExitCode {
    match kind {
        FailureKind::Authentication => ExitCode::Credentials,
        FailureKind::NotFound => ExitCode::NotFound,
        _ => ExitCode::Error,
    }
}

/// Maps a finished batch to an exit code.
///
/// A batch with both successes and failures is a partial failure. A batch
/// where every key failed reports the shared failure kind, or a general
/// error when kinds differ.
pub fn exit_code_for_run<P>(run: &BatchRun<P>) -> ExitCode {
    if run.aborted.is_some() {
        return ExitCode::Credentials;
    }
    if run.summary.all_succeeded() {
        return ExitCode::Success;
    }
    if run.summary.succeeded > 0 {
        return ExitCode::PartialFailure;
    }

    let kinds: Vec<FailureKind> = run.outcomes.iter().filter_map(|o| o.failure_kind()).collect();
    match kinds.first() {
        Some(&first) if kinds.iter().all(|&k| k == first) => exit_code_for_kind(first),
        _ => ExitCode::Error,
    }
}

/// Maps a command error to an exit code.
pub fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if err.downcast_ref::<MissingCredentials>().is_some() {
        return ExitCode::Credentials;
    }
    if let Some(e) = err.downcast_ref::<CollectError>() {
        return exit_code_for_kind(e.kind());
    }
    if let Some(e) = err.downcast_ref::<FetchError>() {
        return exit_code_for_kind(e.kind());
    }
    ExitCode::Error
}

// ============================================================================
// Output
// ============================================================================

/// Returns true if text output should carry ANSI colors.
pub fn use_colors(cli: &Cli) -> bool {
    !cli.no_color
        && cli.format == OutputFormat::Text
        && cli.output_file.is_none()
        && std::io::stdout().is_terminal()
}

/// Writes rendered output to the output file or stdout.
pub async fn emit(cli: &Cli, content: &str) -> Result<()> {
    match &cli.output_file {
        Some(path) => {
            let mut data = content.to_string();
            if !data.ends_with('\n') {
                data.push('\n');
            }
            tokio::fs::write(path, data)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote output");
            if !cli.quiet {
                eprintln!("Output written to {}", path.display());
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use equasis_core::{BatchSummary, Failure, OperationOutcome};

    fn ok(key: &str) -> OperationOutcome<()> {
        OperationOutcome::succeeded(key, (), Vec::new(), 1, Duration::ZERO)
    }

    fn failed(key: &str, kind: FailureKind) -> OperationOutcome<()> {
        OperationOutcome::failed(key, Failure::new(kind, "x"), 1, Duration::ZERO)
    }

    fn run(outcomes: Vec<OperationOutcome<()>>, aborted: Option<Failure>) -> BatchRun<()> {
        let summary = BatchSummary::from_outcomes(&outcomes, Duration::ZERO);
        BatchRun {
            requested: outcomes.len(),
            outcomes,
            summary,
            aborted,
        }
    }

    #[test]
    fn test_exit_codes_for_runs() {
        assert_eq!(exit_code_for_run(&run(vec![ok("a")], None)), ExitCode::Success);
        assert_eq!(
            exit_code_for_run(&run(vec![ok("a"), failed("b", FailureKind::NotFound)], None)),
            ExitCode::PartialFailure
        );
        assert_eq!(
            exit_code_for_run(&run(vec![failed("b", FailureKind::NotFound)], None)),
            ExitCode::NotFound
        );
        assert_eq!(
            exit_code_for_run(&run(
                vec![failed("a", FailureKind::NotFound), failed("b", FailureKind::Server)],
                None
            )),
            ExitCode::Error
        );
        let auth = Failure::new(FailureKind::Authentication, "rejected");
        assert_eq!(
            exit_code_for_run(&run(vec![failed("a", FailureKind::Authentication)], Some(auth))),
            ExitCode::Credentials
        );
    }

    #[test]
    fn test_exit_codes_for_errors() {
        assert_eq!(
            exit_code_for_error(&anyhow::Error::new(MissingCredentials)),
            ExitCode::Credentials
        );
        assert_eq!(
            exit_code_for_error(&anyhow::Error::new(FetchError::Authentication("no".into()))),
            ExitCode::Credentials
        );
        assert_eq!(exit_code_for_error(&anyhow::anyhow!("boom")), ExitCode::Error);
    }

    #[test]
    fn test_missing_credentials_message() {
        let message = MissingCredentials.to_string();

        assert!(message.starts_with("no Equasis credentials found"));
        assert!(message.contains("equasis configure --setup <USERNAME>"));
        assert!(message.contains("EQUASIS_USERNAME and EQUASIS_PASSWORD"));
        assert!(message.ends_with("--username and --password"));
    }

    #[test]
    fn test_batch_mode() {
        let mut config = Config::default();
        assert_eq!(batch_mode(false, &config), BatchMode::ContinueOnError);
        assert_eq!(batch_mode(true, &config), BatchMode::StopOnFirstError);
        config.batch.continue_on_error = false;
        assert_eq!(batch_mode(false, &config), BatchMode::StopOnFirstError);
    }

    #[tokio::test]
    async fn test_read_keys_from_args_and_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("imos.txt");
        tokio::fs::write(&path, "# fleet\n9074729\n\n  9321483  \n").await.unwrap();

        let keys = read_keys(&["9811000".to_string()], Some(&path)).await.unwrap();
        assert_eq!(keys, vec!["9811000", "9074729", "9321483"]);

        assert!(read_keys(&[], None).await.is_err());
    }

    #[test]
    fn test_progress_lines() {
        let printer = ProgressPrinter::new("IMO");
        let mut event = ProgressEvent {
            index: 2,
            total: 3,
            key: "9074729".to_string(),
            phase: ProgressPhase::Started,
            message: None,
        };
        assert_eq!(printer.line(&event), "[2/3] Processing IMO 9074729...");

        event.phase = ProgressPhase::NotFound;
        assert_eq!(printer.line(&event), "[2/3] ⚠ IMO 9074729 not found");

        event.phase = ProgressPhase::Failed;
        event.message = Some("Server error: HTTP 503".to_string());
        assert_eq!(printer.line(&event), "[2/3] ✗ IMO 9074729 error: Server error: HTTP 503");
    }
}
