//! Text output formatting.

use std::path::Path;

use chrono::Local;
use equasis_collect::BatchRun;
use equasis_core::{
    BatchSummary, Failure, FailureKind, FleetProfile, OperationOutcome, TabFailure, VesselProfile,
    VesselSummary,
};
use equasis_store::CredentialReport;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Inspections shown per vessel.
const RECENT_INSPECTIONS: usize = 5;
/// Rule under section headings.
const RULE_WIDTH: usize = 40;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Vessels
    // ========================================================================

    /// Formats every outcome of a vessel batch, then the summary for
    /// multi-key batches.
    pub fn format_vessel_run(&self, run: &BatchRun<VesselProfile>) -> String {
        self.format_run(run, |profile| self.format_vessel(profile))
    }

    /// Formats one vessel profile.
    pub fn format_vessel(&self, profile: &VesselProfile) -> String {
        let id = &profile.identity;
        let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

        let mut lines = vec![
            self.bold(&format!("{} (IMO {})", na(&id.name), na(&id.imo))),
            "─".repeat(RULE_WIDTH),
        ];
        let flag = match (&id.flag, &id.flag_code) {
            (Some(flag), Some(code)) => format!("{flag} ({code})"),
            (flag, _) => na(flag),
        };
        let status = match (&id.status, &id.status_date) {
            (Some(status), Some(date)) => format!("{status} {date}"),
            (status, _) => na(status),
        };
        for (label, value) in [
            ("Flag", flag),
            ("Call sign", na(&id.call_sign)),
            ("MMSI", na(&id.mmsi)),
            ("Type", na(&id.vessel_type)),
            ("Gross tonnage", na(&id.gross_tonnage)),
            ("DWT", na(&id.dwt)),
            ("Year built", na(&id.year_built)),
            ("Status", status),
            ("Last update", na(&id.last_update)),
        ] {
            lines.push(format!("{:<15}{value}", format!("{label}:")));
        }

        if let Some(overview) = &profile.ship_info.overview {
            lines.push(String::new());
            lines.push(self.heading("Overview", None));
            if let Some(colour) = overview.paris_mou {
                lines.push(format!("Paris MoU:     {colour} list"));
            }
            if let Some(colour) = overview.tokyo_mou {
                lines.push(format!("Tokyo MoU:     {colour} list"));
            }
            if let Some(targeting) = overview.uscg_targeting {
                lines.push(format!("USCG:          {targeting}"));
            }
        }

        let info = &profile.ship_info;
        if !info.management.is_empty() {
            lines.push(String::new());
            lines.push(self.heading("Management", Some(info.management.len())));
            for company in &info.management {
                lines.push(format!("• {} ({})", company.name, company.role));
            }
        }

        if !info.classification.is_empty() {
            lines.push(String::new());
            lines.push(self.heading("Classification", Some(info.classification.len())));
            for class in &info.classification {
                match &class.status {
                    Some(status) => lines.push(format!("• {} - {status}", class.society)),
                    None => lines.push(format!("• {}", class.society)),
                }
            }
        }

        if !profile.inspections.is_empty() {
            let shown = profile.inspections.len().min(RECENT_INSPECTIONS);
            lines.push(String::new());
            lines.push(self.heading(
                &format!("Recent PSC inspections ({shown} of {})", profile.inspections.len()),
                None,
            ));
            for inspection in profile.inspections.iter().take(shown) {
                let port = inspection.port.as_deref().unwrap_or("unknown port");
                lines.push(format!(
                    "• {}: {} at {port}",
                    inspection.date, inspection.psc_organization
                ));
                if inspection.is_detention() {
                    let detention = format!("Detention: {}", inspection.detention);
                    lines.push(format!("  {}", self.red(&detention)));
                }
            }
        }

        let history = &profile.history;
        if !history.names.is_empty() {
            lines.push(String::new());
            lines.push(self.heading("Former names", Some(history.names.len())));
            for name in &history.names {
                lines.push(format!("• {} ({})", name.name, name.date_of_effect));
            }
        }
        if !history.flags.is_empty() {
            lines.push(String::new());
            lines.push(self.heading("Former flags", Some(history.flags.len())));
            for flag in &history.flags {
                lines.push(format!("• {} ({})", flag.flag, flag.date_of_effect));
            }
        }

        for conflict in profile.conflicts() {
            lines.push(self.dim(&format!(
                "Note: {} differs on the {} tab ({:?} kept, {:?} ignored)",
                conflict.field.label(),
                conflict.tab.display_name(),
                conflict.kept,
                conflict.ignored
            )));
        }

        lines.join("\n")
    }

    /// Formats notes for tabs that could not be collected.
    pub fn format_tab_failures(&self, failures: &[TabFailure]) -> String {
        failures
            .iter()
            .map(|f| {
                self.yellow(&format!(
                    "⚠ {} tab unavailable: {} ({})",
                    f.tab.display_name(),
                    f.failure.message,
                    f.failure.kind.hint()
                ))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Fleets and search
    // ========================================================================

    /// Formats every outcome of a fleet batch.
    pub fn format_fleet_run(&self, run: &BatchRun<FleetProfile>) -> String {
        self.format_run(run, |fleet| self.format_fleet(fleet))
    }

    /// Formats one company fleet.
    pub fn format_fleet(&self, fleet: &FleetProfile) -> String {
        let mut lines = vec![
            self.bold(&format!("Fleet: {}", fleet.company)),
            format!("Total vessels: {}", fleet.total_vessels),
            "─".repeat(RULE_WIDTH),
        ];
        lines.extend(fleet.vessels.iter().map(|v| self.format_vessel_line(v)));
        lines.join("\n")
    }

    /// Formats name search results.
    pub fn format_search(&self, name: &str, vessels: &[VesselSummary]) -> String {
        if vessels.is_empty() {
            return format!("No vessels found for {name:?}");
        }
        let mut lines = vec![
            self.bold(&format!("Search results for {name:?} ({} found)", vessels.len())),
            "─".repeat(RULE_WIDTH),
        ];
        lines.extend(vessels.iter().map(|v| self.format_vessel_line(v)));
        lines.join("\n")
    }

    fn format_vessel_line(&self, vessel: &VesselSummary) -> String {
        let mut line = format!("{}  {}", self.cyan(&vessel.imo), vessel.name);
        for value in [&vessel.flag, &vessel.vessel_type, &vessel.year_built]
            .into_iter()
            .flatten()
        {
            line.push_str(" | ");
            line.push_str(value);
        }
        line
    }

    // ========================================================================
    // Batches
    // ========================================================================

    fn format_run<P>(&self, run: &BatchRun<P>, profile: impl Fn(&P) -> String) -> String {
        let mut blocks: Vec<String> = run
            .outcomes
            .iter()
            .map(|outcome| self.format_outcome(outcome, &profile))
            .collect();

        if run.requested > 1 || run.aborted.is_some() {
            blocks.push(self.format_summary(&run.summary, run.aborted.as_ref()));
        }
        blocks.join("\n\n")
    }

    fn format_outcome<P>(
        &self,
        outcome: &OperationOutcome<P>,
        profile: &impl Fn(&P) -> String,
    ) -> String {
        match (&outcome.profile, &outcome.failure) {
            (Some(p), _) if outcome.tab_failures.is_empty() => profile(p),
            (Some(p), _) => format!(
                "{}\n\n{}",
                profile(p),
                self.format_tab_failures(&outcome.tab_failures)
            ),
            (None, Some(failure)) => self.format_failure(&outcome.key, failure),
            (None, None) => self.format_failure(
                &outcome.key,
                &Failure::new(FailureKind::Unknown, "no result recorded"),
            ),
        }
    }

    /// Formats a failed key.
    pub fn format_failure(&self, key: &str, failure: &Failure) -> String {
        format!(
            "{} {}: {} ({})",
            self.red("✗"),
            self.bold(key),
            failure.message,
            failure.kind.hint()
        )
    }

    /// Formats a batch summary.
    pub fn format_summary(&self, summary: &BatchSummary, aborted: Option<&Failure>) -> String {
        let mut lines = vec![
            "─".repeat(RULE_WIDTH),
            format!(
                "Processed {}: {} succeeded ({} partial), {} failed in {:.1}s",
                summary.total,
                self.green(&summary.succeeded.to_string()),
                summary.partial,
                self.failed_count(summary.failed),
                summary.elapsed.as_secs_f64()
            ),
        ];
        if !summary.failed_keys.is_empty() {
            lines.push(format!("Failed: {}", summary.failed_keys.join(", ")));
        }
        if let Some(failure) = aborted {
            lines.push(self.red(&format!("Batch aborted: {}", failure.message)));
        }
        let finished = summary.completed_at.with_timezone(&Local);
        lines.push(self.dim(&format!("Completed {}", finished.format("%Y-%m-%d %H:%M:%S"))));
        lines.join("\n")
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Formats which credential sources are present.
    pub fn format_credential_report(
        &self,
        report: &CredentialReport,
        config_path: &Path,
    ) -> String {
        let mark = |present: bool| {
            if present {
                self.green("✓ set")
            } else {
                self.dim("✗ not set")
            }
        };
        let mut lines = vec![
            self.bold("Credential sources"),
            "─".repeat(RULE_WIDTH),
            format!("EQUASIS_USERNAME:    {}", mark(report.env_username)),
            format!("EQUASIS_PASSWORD:    {}", mark(report.env_password)),
            format!(
                "Configured username: {}",
                report.configured_username.as_deref().unwrap_or("none")
            ),
            format!("Keychain password:   {}", mark(report.keychain_password)),
            format!("Config file:         {}", config_path.display()),
        ];
        lines.push(match report.effective_source() {
            Some(source) => format!("In use:              {source}"),
            None => self.yellow("In use:              none (see `equasis configure --setup`)"),
        });
        lines.join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn heading(&self, title: &str, count: Option<usize>) -> String {
        let title = match count {
            Some(n) => format!("{title} ({n})"),
            None => title.to_string(),
        };
        self.bold(&title)
    }

    fn failed_count(&self, failed: usize) -> String {
        if failed == 0 {
            failed.to_string()
        } else {
            self.red(&failed.to_string())
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}
