//! Inspections tab: Port State Control inspection rows.

use std::sync::LazyLock;

use equasis_core::InspectionEntry;
use regex::Regex;
use scraper::Html;

use super::{Row, first_in, table_rows};

/// Row selectors tried in order; the first that yields rows is used.
const INSPECTION_ROWS: &[&str] = &[
    "div#collapse1DD table.tableLSDD tbody tr",
    "div#collapse1DD table.table tbody tr",
    "div.tableLSDD table tbody tr",
    "table.tableLSDD tbody tr",
];

/// Minimum cells: authority, port, date, detention, PSC organisation.
const MIN_CELLS: usize = 5;

static INSPECTION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"P_INSP\.value='(\d+)'").expect("Invalid regex"));

pub(super) fn extract_inspections(html: &Html) -> Vec<InspectionEntry> {
    INSPECTION_ROWS
        .iter()
        .map(|css| table_rows(html, css, MIN_CELLS, "inspections"))
        .find(|rows| !rows.is_empty())
        .unwrap_or_default()
        .into_iter()
        .map(|row| InspectionEntry {
            authority: row.optional(0),
            port: row.optional(1),
            date: row.cell(2),
            detention: row.cell(3),
            psc_organization: row.cell(4),
            inspection_type: row.optional(5),
            duration: row.optional(6),
            deficiencies: row.optional(7),
            inspection_id: inspection_id(&row),
        })
        .collect()
}

/// Reads the inspection id from the row's `onclick`, or from a link with
/// one inside the row.
fn inspection_id(row: &Row<'_>) -> Option<String> {
    let onclick = row
        .element
        .value()
        .attr("onclick")
        .or_else(|| first_in(row.element, "a[onclick]").and_then(|a| a.value().attr("onclick")))?;
    INSPECTION_ID_RE
        .captures(onclick)
        .map(|caps| caps[1].to_string())
}
