//! Vessel listings: company fleets and name-search results.

use equasis_core::{FleetProfile, VesselSummary};
use equasis_fetch::RawDocument;
use scraper::Html;
use tracing::debug;

use super::{has_not_found_marker, table_rows};
use crate::error::ExtractError;

const LISTING_ROWS: &str = "table.tableLS tbody tr";

/// Extracts vessel rows from a listing page.
///
/// Only rows whose first cell is a seven-digit IMO number are kept; other
/// rows (headers, company details) are ignored. An empty list is a valid
/// result.
pub fn extract_vessel_list(document: &RawDocument) -> Vec<VesselSummary> {
    let html = Html::parse_document(&document.body);
    vessel_rows(&html)
}

/// Extracts a company's fleet.
///
/// Fails with [`ExtractError::NotFound`] when the page says the company does
/// not exist or lists no vessel.
pub fn extract_fleet(document: &RawDocument, company: &str) -> Result<FleetProfile, ExtractError> {
    let html = Html::parse_document(&document.body);

    if has_not_found_marker(&html) {
        return Err(ExtractError::NotFound(format!("no company matches {company:?}")));
    }

    let vessels = vessel_rows(&html);
    if vessels.is_empty() {
        return Err(ExtractError::NotFound(format!("no vessels listed for {company:?}")));
    }

    debug!(company, vessels = vessels.len(), "Extracted fleet");
    Ok(FleetProfile::new(company, vessels))
}

fn vessel_rows(html: &Html) -> Vec<VesselSummary> {
    table_rows(html, LISTING_ROWS, 2, "vessel listing")
        .into_iter()
        .filter(|row| is_imo(&row.cells[0]))
        .map(|row| VesselSummary {
            imo: row.cell(0),
            name: row.cell(1),
            gross_tonnage: row.optional(2),
            vessel_type: row.optional(3),
            year_built: row.optional(4),
            flag: row.optional(5),
            status: row.optional(6),
        })
        .collect()
}

fn is_imo(cell: &str) -> bool {
    cell.len() == 7 && cell.bytes().all(|b| b.is_ascii_digit())
}
