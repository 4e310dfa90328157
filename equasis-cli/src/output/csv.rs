//! CSV output formatting.
//!
//! One row per key. Fields containing separators, quotes or line breaks
//! are quoted with embedded quotes doubled.

use equasis_core::{FleetProfile, OperationOutcome, VesselProfile, VesselSummary};

const VESSEL_HEADER: [&str; 13] = [
    "imo",
    "name",
    "flag",
    "call_sign",
    "mmsi",
    "vessel_type",
    "gross_tonnage",
    "dwt",
    "year_built",
    "status",
    "inspections",
    "detentions",
    "error",
];

const SUMMARY_HEADER: [&str; 7] = [
    "imo",
    "name",
    "flag",
    "vessel_type",
    "gross_tonnage",
    "year_built",
    "status",
];

/// CSV formatter.
#[derive(Debug, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Creates a new CSV formatter.
    pub fn new() -> Self {
        Self
    }

    /// Formats vessel outcomes, failed keys included with only the key and
    /// the error column filled.
    pub fn format_vessel_outcomes(&self, outcomes: &[OperationOutcome<VesselProfile>]) -> String {
        let mut out = row(VESSEL_HEADER);
        for outcome in outcomes {
            let error = outcome_error(outcome);
            let line = match &outcome.profile {
                Some(profile) => {
                    let id = &profile.identity;
                    let inspections = profile.inspections.len().to_string();
                    let detentions = profile
                        .inspections
                        .iter()
                        .filter(|i| i.is_detention())
                        .count()
                        .to_string();
                    row([
                        id.imo.as_deref().unwrap_or(&outcome.key),
                        opt(&id.name),
                        opt(&id.flag),
                        opt(&id.call_sign),
                        opt(&id.mmsi),
                        opt(&id.vessel_type),
                        opt(&id.gross_tonnage),
                        opt(&id.dwt),
                        opt(&id.year_built),
                        opt(&id.status),
                        inspections.as_str(),
                        detentions.as_str(),
                        error.as_str(),
                    ])
                }
                None => {
                    let mut cells = [""; 13];
                    cells[0] = outcome.key.as_str();
                    cells[12] = error.as_str();
                    row(cells)
                }
            };
            out.push_str(&line);
        }
        out
    }

    /// Formats fleet outcomes, one row per vessel with the company first.
    pub fn format_fleet_outcomes(&self, outcomes: &[OperationOutcome<FleetProfile>]) -> String {
        let mut out = row(
            std::iter::once("company")
                .chain(SUMMARY_HEADER)
                .chain(std::iter::once("error")),
        );
        for outcome in outcomes {
            match &outcome.profile {
                Some(fleet) => {
                    for vessel in &fleet.vessels {
                        out.push_str(&row(
                            std::iter::once(fleet.company.as_str())
                                .chain(summary_cells(vessel))
                                .chain(std::iter::once("")),
                        ));
                    }
                }
                None => {
                    let error = outcome_error(outcome);
                    let mut cells = [""; 9];
                    cells[0] = outcome.key.as_str();
                    cells[8] = error.as_str();
                    out.push_str(&row(cells));
                }
            }
        }
        out
    }

    /// Formats a plain vessel list such as search results.
    pub fn format_vessel_list(&self, vessels: &[VesselSummary]) -> String {
        let mut out = row(SUMMARY_HEADER);
        for vessel in vessels {
            out.push_str(&row(summary_cells(vessel)));
        }
        out
    }
}

fn summary_cells(vessel: &VesselSummary) -> [&str; 7] {
    [
        vessel.imo.as_str(),
        vessel.name.as_str(),
        opt(&vessel.flag),
        opt(&vessel.vessel_type),
        opt(&vessel.gross_tonnage),
        opt(&vessel.year_built),
        opt(&vessel.status),
    ]
}

fn outcome_error<P>(outcome: &OperationOutcome<P>) -> String {
    match &outcome.failure {
        Some(failure) => format!("{}: {}", failure.kind.label(), failure.message),
        None => outcome
            .tab_failures
            .iter()
            .map(|f| format!("{}: {}", f.tab.as_str(), f.failure.message))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn row<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
    let mut line = cells.into_iter().map(escape).collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}

/// Quotes a field when it would otherwise break the row.
pub(crate) fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
