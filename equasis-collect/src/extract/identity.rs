//! The identity block printed on every vessel page.

use std::sync::LazyLock;

use equasis_core::{IdentityField, VesselIdentity};
use regex::Regex;
use scraper::{ElementRef, Html};

use super::{first_in, select_all, select_first, text_of};

// ============================================================================
// Rules
// ============================================================================

/// Heading holding the name (first `<b>`) and the IMO number.
const HEADING: &str = "h4.color-gris-bleu-copyright";
/// Label/value rows.
const ROWS: &str = "div.row";
/// Badge carrying the last-update date.
const UPDATE_BADGE: &str = "p.badge.gris-bleu-copyright.badge-notification";

static IMO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"IMO[^0-9]*(\d{7})").expect("Invalid regex"));

static FLAG_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/flags/([A-Z]+)\.").expect("Invalid regex"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}/\d{2}/\d{4})").expect("Invalid regex"));

#[derive(Debug, Clone, Copy)]
enum LabelMatch {
    Contains(&'static str),
    Exact(&'static str),
}

use LabelMatch::{Contains, Exact};

impl LabelMatch {
    fn matches(self, label: &str) -> bool {
        match self {
            Self::Contains(needle) => label.contains(needle),
            Self::Exact(expected) => label == expected,
        }
    }
}

/// How the value columns of a matched row are read.
#[derive(Debug, Clone, Copy)]
enum RowKind {
    /// Second column text.
    Plain,
    /// Flag code from the image, country from the parenthesised third column.
    Flag,
    /// Second column text, plus a status date from the third column.
    Status,
}

#[derive(Debug, Clone, Copy)]
struct RowRule {
    label: LabelMatch,
    field: IdentityField,
    kind: RowKind,
}

impl RowRule {
    const fn new(label: LabelMatch, field: IdentityField, kind: RowKind) -> Self {
        Self { label, field, kind }
    }
}

/// Label rules, first match wins. Labels are compared lowercased.
const ROW_RULES: &[RowRule] = &[
    RowRule::new(Contains("flag"), IdentityField::Flag, RowKind::Flag),
    RowRule::new(Contains("call sign"), IdentityField::CallSign, RowKind::Plain),
    RowRule::new(Contains("mmsi"), IdentityField::Mmsi, RowKind::Plain),
    RowRule::new(Contains("gross tonnage"), IdentityField::GrossTonnage, RowKind::Plain),
    RowRule::new(Contains("dwt"), IdentityField::Dwt, RowKind::Plain),
    RowRule::new(Contains("type of ship"), IdentityField::VesselType, RowKind::Plain),
    RowRule::new(Contains("year of build"), IdentityField::YearBuilt, RowKind::Plain),
    RowRule::new(Contains("year built"), IdentityField::YearBuilt, RowKind::Plain),
    RowRule::new(Exact("status"), IdentityField::Status, RowKind::Status),
];

// ============================================================================
// Extraction
// ============================================================================

/// Extracts the identity block. Never fails; absent fields stay `None`.
pub(super) fn extract_identity(html: &Html) -> VesselIdentity {
    let mut identity = VesselIdentity::default();

    if let Some(heading) = select_first(html, HEADING) {
        if let Some(name) = first_in(heading, "b") {
            identity.set(IdentityField::Name, text_of(name));
        }
        if let Some(caps) = IMO_RE.captures(&text_of(heading)) {
            identity.set(IdentityField::Imo, &caps[1]);
        }
    }

    for row in select_all(html, ROWS) {
        let cols: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| is_column(*el))
            .collect();
        if cols.len() < 2 {
            continue;
        }

        let Some(label) = first_in(cols[0], "b").map(|b| text_of(b).to_lowercase()) else {
            continue;
        };
        if let Some(rule) = ROW_RULES.iter().find(|r| r.label.matches(&label)) {
            apply_rule(&mut identity, *rule, &cols);
        }
    }

    if let Some(badge) = select_first(html, UPDATE_BADGE) {
        if let Some(caps) = DATE_RE.captures(&text_of(badge)) {
            identity.set(IdentityField::LastUpdate, &caps[1]);
        }
    }

    identity
}

fn is_column(element: ElementRef<'_>) -> bool {
    element.value().name() == "div"
        && element
            .value()
            .attr("class")
            .is_some_and(|c| c.contains("col-"))
}

fn apply_rule(identity: &mut VesselIdentity, rule: RowRule, cols: &[ElementRef<'_>]) {
    let value = text_of(cols[1]);
    let third = cols.get(2).map(|c| text_of(*c));

    match rule.kind {
        RowKind::Plain => identity.set(rule.field, value),
        RowKind::Flag => {
            let code = first_in(cols[1], "img")
                .and_then(|img| img.value().attr("src"))
                .and_then(|src| FLAG_CODE_RE.captures(src))
                .map(|caps| caps[1].to_string());
            if let Some(code) = code {
                identity.set(IdentityField::FlagCode, code);
            }

            let country = third
                .as_deref()
                .and_then(|t| t.strip_prefix('(').and_then(|t| t.strip_suffix(')')))
                .map(str::to_string)
                .unwrap_or(value);
            identity.set(rule.field, country);
        }
        RowKind::Status => {
            identity.set(rule.field, value);
            if let Some(date) = third.filter(|t| t.contains("since") || t.contains("during")) {
                identity.set(IdentityField::StatusDate, date);
            }
        }
    }
}
