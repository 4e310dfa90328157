//! Per-key outcomes and batch summaries.
//!
//! Both are created once and never mutated afterwards; output layers only
//! read them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::tab::TabKind;
use crate::error::{Failure, FailureKind};

// ============================================================================
// Tab Failure
// ============================================================================

/// A non-primary tab that could not be collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabFailure {
    /// The tab.
    pub tab: TabKind,
    /// Why it failed.
    pub failure: Failure,
}

// ============================================================================
// Operation Outcome
// ============================================================================

/// The result of collecting one entity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome<P> {
    /// Entity key as given by the caller.
    pub key: String,
    /// Whether a profile was produced.
    pub success: bool,
    /// The (possibly partial) profile.
    pub profile: Option<P>,
    /// Terminal failure when `success` is false.
    pub failure: Option<Failure>,
    /// Per-tab failures that did not fail the whole entity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tab_failures: Vec<TabFailure>,
    /// Outbound requests made for this key, retries included.
    pub attempts: u32,
    /// Wall time spent on this key.
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

impl<P> OperationOutcome<P> {
    /// Creates a successful outcome.
    pub fn succeeded(
        key: impl Into<String>,
        profile: P,
        tab_failures: Vec<TabFailure>,
        attempts: u32,
        elapsed: Duration,
    ) -> Self {
        Self {
            key: key.into(),
            success: true,
            profile: Some(profile),
            failure: None,
            tab_failures,
            attempts,
            elapsed,
        }
    }

    /// Creates a failed outcome.
    pub fn failed(
        key: impl Into<String>,
        failure: Failure,
        attempts: u32,
        elapsed: Duration,
    ) -> Self {
        Self {
            key: key.into(),
            success: false,
            profile: None,
            failure: Some(failure),
            tab_failures: Vec::new(),
            attempts,
            elapsed,
        }
    }

    /// Returns true if a profile was produced.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns true if the profile is missing one or more tabs.
    pub fn is_partial(&self) -> bool {
        self.success && !self.tab_failures.is_empty()
    }

    /// Returns the failure kind, if the outcome failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }

    /// Returns the failure for a tab, if that tab failed.
    pub fn tab_failure(&self, tab: TabKind) -> Option<&Failure> {
        self.tab_failures
            .iter()
            .find(|f| f.tab == tab)
            .map(|f| &f.failure)
    }
}

// ============================================================================
// Batch Summary
// ============================================================================

/// Aggregate over the outcomes of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Keys processed.
    pub total: usize,
    /// Keys that produced a profile.
    pub succeeded: usize,
    /// Successful keys with at least one failed tab.
    pub partial: usize,
    /// Keys that failed.
    pub failed: usize,
    /// Failed keys in input order.
    pub failed_keys: Vec<String>,
    /// Total wall time.
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
    /// When the batch finished.
    pub completed_at: DateTime<Utc>,
}

impl BatchSummary {
    /// Builds a summary from outcomes.
    pub fn from_outcomes<P>(outcomes: &[OperationOutcome<P>], elapsed: Duration) -> Self {
        let failed_keys: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.key.clone())
            .collect();

        Self {
            total: outcomes.len(),
            succeeded: outcomes.len() - failed_keys.len(),
            partial: outcomes.iter().filter(|o| o.is_partial()).count(),
            failed: failed_keys.len(),
            failed_keys,
            elapsed,
            completed_at: Utc::now(),
        }
    }

    /// Returns true if every key succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

// ============================================================================
// Serde helpers
// ============================================================================

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
