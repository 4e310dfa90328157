//! List-valued sections, each owned by exactly one tab.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Ship Info Tab
// ============================================================================

/// Flag performance list colour (Paris / Tokyo MoU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListColor {
    /// White list.
    White,
    /// Grey list.
    Grey,
    /// Black list.
    Black,
}

impl ListColor {
    /// Parses a colour from a CSS class string.
    pub fn from_classes(classes: &str) -> Option<Self> {
        let lower = classes.to_ascii_lowercase();
        if lower.contains("black") {
            Some(Self::Black)
        } else if lower.contains("grey") || lower.contains("gray") {
            Some(Self::Grey)
        } else if lower.contains("white") {
            Some(Self::White)
        } else {
            None
        }
    }
}

impl fmt::Display for ListColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "White",
            Self::Grey => "Grey",
            Self::Black => "Black",
        })
    }
}

/// USCG targeting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UscgTargeting {
    /// Vessel is targeted.
    Targeted,
    /// Vessel is not targeted.
    NotTargeted,
}

impl fmt::Display for UscgTargeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Targeted => "Targeted",
            Self::NotTargeted => "Not targeted",
        })
    }
}

/// Flag performance and targeting overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// Paris MoU list colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paris_mou: Option<ListColor>,
    /// Tokyo MoU list colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokyo_mou: Option<ListColor>,
    /// USCG targeting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uscg_targeting: Option<UscgTargeting>,
}

impl Overview {
    /// Returns true if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.paris_mou.is_none() && self.tokyo_mou.is_none() && self.uscg_targeting.is_none()
    }
}

/// A company currently associated with the vessel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEntry {
    /// Company IMO number.
    pub imo: Option<String>,
    /// Role (registered owner, ISM manager, ...).
    pub role: String,
    /// Company name.
    pub name: String,
    /// Postal address.
    pub address: Option<String>,
    /// Date of effect.
    pub date_of_effect: Option<String>,
}

/// A classification society record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    /// Society name.
    pub society: String,
    /// Status badge text.
    pub status: Option<String>,
    /// Date text ("since ...", "during ...").
    pub date_of_effect: Option<String>,
}

/// A reported geographical position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoEntry {
    /// Report date.
    pub date: String,
    /// Area.
    pub area: String,
    /// Reporting source.
    pub source: String,
}

/// Sections owned by the ship info tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipInfoSections {
    /// Flag performance overview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    /// Management companies.
    #[serde(default)]
    pub management: Vec<CompanyEntry>,
    /// Classification societies.
    #[serde(default)]
    pub classification: Vec<ClassificationEntry>,
    /// Geographical reports.
    #[serde(default)]
    pub geographical: Vec<GeoEntry>,
}

impl ShipInfoSections {
    /// Returns true if no section has content.
    pub fn is_empty(&self) -> bool {
        self.overview.as_ref().is_none_or(Overview::is_empty)
            && self.management.is_empty()
            && self.classification.is_empty()
            && self.geographical.is_empty()
    }
}

// ============================================================================
// Inspections Tab
// ============================================================================

/// A Port State Control inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionEntry {
    /// Inspecting authority.
    pub authority: Option<String>,
    /// Port of inspection.
    pub port: Option<String>,
    /// Inspection date.
    pub date: String,
    /// Detention text ("No detention", ...).
    pub detention: String,
    /// PSC organisation.
    pub psc_organization: String,
    /// Inspection type.
    pub inspection_type: Option<String>,
    /// Duration in days.
    pub duration: Option<String>,
    /// Number of deficiencies.
    pub deficiencies: Option<String>,
    /// Remote inspection identifier.
    pub inspection_id: Option<String>,
}

impl InspectionEntry {
    /// Returns true if the inspection resulted in a detention.
    pub fn is_detention(&self) -> bool {
        let text = self.detention.trim().to_ascii_lowercase();
        !(text.is_empty() || text == "n" || text == "no" || text.starts_with("no detention"))
    }
}

// ============================================================================
// Ship History Tab
// ============================================================================

/// A former vessel name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalName {
    /// Name.
    pub name: String,
    /// Date of effect.
    pub date_of_effect: String,
    /// Source.
    pub source: String,
}

/// A former flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalFlag {
    /// Flag.
    pub flag: String,
    /// Date of effect.
    pub date_of_effect: String,
    /// Source.
    pub source: String,
}

/// A former company association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalCompany {
    /// Company name.
    pub company: String,
    /// Role.
    pub role: String,
    /// Date of effect.
    pub date_of_effect: String,
    /// Source.
    pub source: String,
}

/// Sections owned by the ship history tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySections {
    /// Former names.
    #[serde(default)]
    pub names: Vec<HistoricalName>,
    /// Former flags.
    #[serde(default)]
    pub flags: Vec<HistoricalFlag>,
    /// Former companies.
    #[serde(default)]
    pub companies: Vec<HistoricalCompany>,
}

impl HistorySections {
    /// Returns true if no section has content.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.flags.is_empty() && self.companies.is_empty()
    }
}
