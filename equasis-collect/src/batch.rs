//! Batch orchestration.
//!
//! [`run_batch`] drives a [`Collector`] over an ordered list of keys, one at
//! a time, through a single session. Outcomes keep input order. A failed key
//! never stops the batch unless [`BatchMode::StopOnFirstError`] is chosen; an
//! authentication failure always does.

use std::time::{Duration, Instant};

use equasis_core::{BatchSummary, Failure, FailureKind, OperationOutcome};
use equasis_fetch::{FetchSettings, SessionGateway};
use tracing::{debug, info, warn};

use crate::collector::Collector;

// ============================================================================
// Options
// ============================================================================

/// What to do after a key fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Record the failure and move on to the next key.
    #[default]
    ContinueOnError,
    /// Skip the remaining keys.
    StopOnFirstError,
}

/// Batch options.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Failure handling.
    pub mode: BatchMode,
    /// Pause between two keys.
    pub entity_pause: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mode: BatchMode::ContinueOnError,
            entity_pause: Duration::from_secs(1),
        }
    }
}

impl BatchOptions {
    /// Creates options paced by the fetch settings.
    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self {
            entity_pause: settings.entity_pause,
            ..Self::default()
        }
    }

    /// Sets the failure handling mode.
    pub fn with_mode(mut self, mode: BatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the pause between keys.
    pub fn with_entity_pause(mut self, pause: Duration) -> Self {
        self.entity_pause = pause;
        self
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Where a key is in its processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    /// About to be collected.
    Started,
    /// Collected with every tab.
    Succeeded,
    /// Collected with at least one failed tab.
    Partial,
    /// The portal has no such entity.
    NotFound,
    /// Failed for any other reason.
    Failed,
}

impl ProgressPhase {
    fn of<P>(outcome: &OperationOutcome<P>) -> Self {
        match outcome.failure_kind() {
            None if outcome.is_partial() => Self::Partial,
            None => Self::Succeeded,
            Some(FailureKind::NotFound) => Self::NotFound,
            Some(_) => Self::Failed,
        }
    }

    /// Returns true for the phases emitted after a key is done.
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Started)
    }
}

/// A progress notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Position of the key, starting at 1.
    pub index: usize,
    /// Number of keys in the batch.
    pub total: usize,
    /// The key as given.
    pub key: String,
    /// Processing phase.
    pub phase: ProgressPhase,
    /// Failure message, for failed keys.
    pub message: Option<String>,
}

/// Receives progress events.
pub trait ProgressSink: Send {
    /// Called before and after each key.
    fn on_progress(&mut self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressEvent) + Send,
{
    fn on_progress(&mut self, event: &ProgressEvent) {
        self(event);
    }
}

/// A sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}

// ============================================================================
// Batch Run
// ============================================================================

/// The result of a batch.
#[derive(Debug)]
pub struct BatchRun<P> {
    /// One outcome per processed key, in input order.
    pub outcomes: Vec<OperationOutcome<P>>,
    /// Aggregate over `outcomes`.
    pub summary: BatchSummary,
    /// The authentication failure that stopped the batch, if any.
    pub aborted: Option<Failure>,
    /// Number of keys given to the batch.
    pub requested: usize,
}

impl<P> BatchRun<P> {
    /// Returns true if keys were left unprocessed.
    pub fn stopped_early(&self) -> bool {
        self.summary.total < self.requested
    }
}

/// Runs `collector` over `keys` in order.
///
/// Keys after a stop (authentication failure, or any failure under
/// [`BatchMode::StopOnFirstError`]) get no outcome. The entity pause is
/// skipped after the last key and after keys rejected before any request.
pub async fn run_batch<C>(
    collector: &C,
    gateway: &mut SessionGateway,
    keys: &[String],
    options: &BatchOptions,
    progress: &mut dyn ProgressSink,
) -> BatchRun<C::Profile>
where
    C: Collector + ?Sized,
{
    let started = Instant::now();
    let total = keys.len();
    let mut outcomes = Vec::with_capacity(total);
    let mut aborted = None;

    info!(collector = collector.name(), total, mode = ?options.mode, "Batch started");

    for (i, key) in keys.iter().enumerate() {
        let index = i + 1;
        progress.on_progress(&ProgressEvent {
            index,
            total,
            key: key.clone(),
            phase: ProgressPhase::Started,
            message: None,
        });

        let outcome = collector.collect(gateway, key).await;
        let phase = ProgressPhase::of(&outcome);
        debug!(key = %key, index, ?phase, attempts = outcome.attempts, "Key finished");

        progress.on_progress(&ProgressEvent {
            index,
            total,
            key: key.clone(),
            phase,
            message: outcome.failure.as_ref().map(|f| f.message.clone()),
        });

        let failure = outcome.failure.clone();
        let attempts = outcome.attempts;
        outcomes.push(outcome);

        if let Some(failure) = failure {
            if failure.kind.aborts_batch() {
                warn!(
                    key = %key,
                    error = %failure.message,
                    "Authentication failed, aborting batch"
                );
                aborted = Some(failure);
                break;
            }
            if options.mode == BatchMode::StopOnFirstError {
                warn!(key = %key, "Stopping batch on first error");
                break;
            }
        }

        if index < total && attempts > 0 {
            gateway.pause(options.entity_pause).await;
        }
    }

    let summary = BatchSummary::from_outcomes(&outcomes, started.elapsed());
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        elapsed = ?summary.elapsed,
        "Batch finished"
    );

    BatchRun {
        outcomes,
        summary,
        aborted,
        requested: total,
    }
}
