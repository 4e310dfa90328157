//! JSON output formatting.

use anyhow::Result;
use equasis_collect::BatchRun;
use equasis_core::{BatchSummary, Failure, OperationOutcome};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON document for a batch run.
#[derive(Debug, Serialize)]
pub struct BatchReport<'a, P> {
    /// One entry per processed key.
    pub outcomes: &'a [OperationOutcome<P>],
    /// Aggregate counts.
    pub summary: &'a BatchSummary,
    /// Set when an authentication failure stopped the batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<&'a Failure>,
    /// Keys given but never processed.
    pub skipped: usize,
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a batch run with its summary.
    pub fn format_run<P: Serialize>(&self, run: &BatchRun<P>) -> Result<String> {
        let report = BatchReport {
            outcomes: &run.outcomes,
            summary: &run.summary,
            aborted: run.aborted.as_ref(),
            skipped: run.requested.saturating_sub(run.outcomes.len()),
        };
        self.format(&report)
    }
}
