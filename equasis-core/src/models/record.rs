//! Per-tab partial records and the merged vessel profile.

use serde::{Deserialize, Serialize};

use super::sections::{HistorySections, InspectionEntry, ShipInfoSections};
use super::tab::{IdentityField, TabKind, VesselIdentity};

// ============================================================================
// Partial Record
// ============================================================================

/// Tab-specific content of a partial record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tab", content = "sections", rename_all = "snake_case")]
pub enum TabContent {
    /// Ship info sections.
    ShipInfo(ShipInfoSections),
    /// Inspection list.
    Inspections(Vec<InspectionEntry>),
    /// History sections.
    ShipHistory(HistorySections),
}

impl TabContent {
    /// Returns empty content for a tab.
    pub fn empty(tab: TabKind) -> Self {
        match tab {
            TabKind::ShipInfo => Self::ShipInfo(ShipInfoSections::default()),
            TabKind::Inspections => Self::Inspections(Vec::new()),
            TabKind::ShipHistory => Self::ShipHistory(HistorySections::default()),
        }
    }

    /// Returns the tab this content belongs to.
    pub fn tab(&self) -> TabKind {
        match self {
            Self::ShipInfo(_) => TabKind::ShipInfo,
            Self::Inspections(_) => TabKind::Inspections,
            Self::ShipHistory(_) => TabKind::ShipHistory,
        }
    }

    /// Returns true if no section has content.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::ShipInfo(s) => s.is_empty(),
            Self::Inspections(list) => list.is_empty(),
            Self::ShipHistory(s) => s.is_empty(),
        }
    }
}

/// What one fetched tab contributes to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRecord {
    /// Identity block found on the page.
    pub identity: VesselIdentity,
    /// Tab-specific sections.
    pub content: TabContent,
}

impl PartialRecord {
    /// Creates a record with an identity and no section content.
    pub fn empty(tab: TabKind, identity: VesselIdentity) -> Self {
        Self {
            identity,
            content: TabContent::empty(tab),
        }
    }

    /// Returns the tab that produced this record.
    pub fn tab(&self) -> TabKind {
        self.content.tab()
    }
}

// ============================================================================
// Vessel Profile
// ============================================================================

/// A first-non-empty field that a later tab reported differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConflict {
    /// The field.
    pub field: IdentityField,
    /// Value kept in the profile.
    pub kept: String,
    /// Value that was ignored.
    pub ignored: String,
    /// Tab that reported the ignored value.
    pub tab: TabKind,
}

/// The merged, canonical view of one vessel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselProfile {
    /// Scalar identity fields.
    pub identity: VesselIdentity,
    /// Ship info sections.
    #[serde(default)]
    pub ship_info: ShipInfoSections,
    /// PSC inspections.
    #[serde(default)]
    pub inspections: Vec<InspectionEntry>,
    /// History sections.
    #[serde(default)]
    pub history: HistorySections,
    /// Tabs merged into this profile, in merge order.
    #[serde(default)]
    pub merged_tabs: Vec<TabKind>,
    /// Disagreements on first-non-empty fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<FieldConflict>,
}

impl VesselProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the IMO number, if known.
    pub fn imo(&self) -> Option<&str> {
        self.identity.imo.as_deref()
    }

    /// Returns the vessel name, if known.
    pub fn name(&self) -> Option<&str> {
        self.identity.name.as_deref()
    }

    /// Returns first-non-empty fields that a later tab reported differently.
    pub fn conflicts(&self) -> &[FieldConflict] {
        &self.conflicts
    }

    /// Returns true if the given tab has been merged.
    pub fn has_tab(&self, tab: TabKind) -> bool {
        self.merged_tabs.contains(&tab)
    }
}
