//! Per-tab document extraction.
//!
//! Every vessel page carries the same identity block, extracted by
//! [`identity`]; each tab then adds its own sections. Each field and each
//! table row is extracted independently: a missing section leaves that
//! section empty and a short row is skipped, while the rest of the page is
//! still read.
//!
//! Selectors and row shapes live in rule tables at the top of each
//! submodule so a layout change is a table edit.

mod history;
mod identity;
mod inspections;
mod listing;
mod ship_info;

use equasis_core::{PartialRecord, TabContent, TabKind};
use equasis_fetch::RawDocument;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::ExtractError;

pub use listing::{extract_fleet, extract_vessel_list};

/// Phrases the portal shows when a search has no result.
const NOT_FOUND_MARKERS: &[&str] = &[
    "no ship has been found",
    "no ship found",
    "no company has been found",
    "no company found",
    "no result has been found",
    "no results found",
];

// ============================================================================
// Entry Point
// ============================================================================

/// Extracts one vessel tab into a partial record.
///
/// Fails only when the page is not a vessel page at all: with a
/// [`ExtractError::NotFound`] when the portal says the vessel does not
/// exist, and [`ExtractError::UnexpectedDocument`] otherwise.
pub fn extract(document: &RawDocument, tab: TabKind) -> Result<PartialRecord, ExtractError> {
    let html = Html::parse_document(&document.body);

    let identity = identity::extract_identity(&html);
    if !identity.is_anchored() {
        if has_not_found_marker(&html) {
            return Err(ExtractError::NotFound(format!(
                "the {} page reports no such vessel",
                tab.display_name()
            )));
        }
        return Err(ExtractError::UnexpectedDocument(format!(
            "no vessel identity block on the {} page",
            tab.display_name()
        )));
    }

    let content = match tab {
        TabKind::ShipInfo => TabContent::ShipInfo(ship_info::extract_ship_info(&html)),
        TabKind::Inspections => TabContent::Inspections(inspections::extract_inspections(&html)),
        TabKind::ShipHistory => TabContent::ShipHistory(history::extract_history(&html)),
    };

    debug!(%tab, empty = content.is_empty(), "Extracted tab");
    Ok(PartialRecord { identity, content })
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Parses a CSS selector. Rule tables only hold static selectors, so a
/// failure here means a bad table entry; it is logged and treated as
/// "nothing matched".
fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!(css, error = %e, "Invalid selector");
            None
        }
    }
}

/// Returns all matches in the document.
fn select_all<'a>(html: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    selector(css).map_or_else(Vec::new, |s| html.select(&s).collect())
}

/// Returns the first match in the document.
fn select_first<'a>(html: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    selector(css).and_then(|s| html.select(&s).next())
}

/// Returns all matches under an element.
fn select_in<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    selector(css).map_or_else(Vec::new, |s| element.select(&s).collect())
}

/// Returns the first match under an element.
fn first_in<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    selector(css).and_then(|s| element.select(&s).next())
}

/// Text content with whitespace runs collapsed.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `None` for blank strings.
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A table row and its cell texts.
struct Row<'a> {
    element: ElementRef<'a>,
    cells: Vec<String>,
}

impl Row<'_> {
    fn cell(&self, index: usize) -> String {
        self.cells.get(index).cloned().unwrap_or_default()
    }

    fn optional(&self, index: usize) -> Option<String> {
        self.cells.get(index).and_then(|c| non_empty(c))
    }
}

/// Collects the rows matched by `css` that have at least `min_cells`
/// cells. Rows without any `td` (header rows) are ignored; shorter rows are
/// skipped and counted.
fn table_rows<'a>(html: &'a Html, css: &str, min_cells: usize, section: &str) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for element in select_all(html, css) {
        let cells: Vec<String> = select_in(element, "td").into_iter().map(text_of).collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() < min_cells {
            skipped += 1;
            continue;
        }
        rows.push(Row { element, cells });
    }

    if skipped > 0 {
        debug!(section, skipped, min_cells, "Skipped short rows");
    }
    rows
}

/// Returns true if the page says the search had no result.
fn has_not_found_marker(html: &Html) -> bool {
    let text = html.root_element().text().collect::<String>().to_lowercase();
    NOT_FOUND_MARKERS.iter().any(|m| text.contains(m))
}
