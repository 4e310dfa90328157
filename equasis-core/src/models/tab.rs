//! Tab kinds and the identity block shared by every tab.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Tab Kind
// ============================================================================

/// One of the vessel pages fetched for an IMO number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabKind {
    /// Ship info: identity, overview, management, classification, geography.
    ShipInfo,
    /// Port State Control inspections.
    Inspections,
    /// Former names, flags, and companies.
    ShipHistory,
}

impl TabKind {
    /// Fixed fetch order. The first tab anchors the profile's identity.
    pub const ORDER: [TabKind; 3] = [Self::ShipInfo, Self::Inspections, Self::ShipHistory];

    /// Returns the stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShipInfo => "ship_info",
            Self::Inspections => "inspections",
            Self::ShipHistory => "ship_history",
        }
    }

    /// Returns a human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ShipInfo => "Ship info",
            Self::Inspections => "Inspections",
            Self::ShipHistory => "Ship history",
        }
    }

    /// Returns true for the identity-bearing tab.
    pub fn is_primary(self) -> bool {
        self == Self::ShipInfo
    }
}

impl fmt::Display for TabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Identity Fields
// ============================================================================

/// How a scalar identity field behaves when several tabs report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePrecedence {
    /// The first non-empty value is kept; later values are ignored.
    FirstNonEmpty,
    /// A later non-empty value replaces the earlier one.
    LatestNonEmpty,
}

/// Names of the scalar identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    /// IMO number.
    Imo,
    /// Vessel name.
    Name,
    /// Flag state.
    Flag,
    /// Three-letter flag code.
    FlagCode,
    /// Radio call sign.
    CallSign,
    /// MMSI.
    Mmsi,
    /// Gross tonnage.
    GrossTonnage,
    /// Deadweight tonnage.
    Dwt,
    /// Type of ship.
    VesselType,
    /// Year of build.
    YearBuilt,
    /// Ship status.
    Status,
    /// When the status took effect.
    StatusDate,
    /// Date of the last record update.
    LastUpdate,
}

impl IdentityField {
    /// All identity fields in display order.
    pub const ALL: [IdentityField; 13] = [
        Self::Imo,
        Self::Name,
        Self::Flag,
        Self::FlagCode,
        Self::CallSign,
        Self::Mmsi,
        Self::GrossTonnage,
        Self::Dwt,
        Self::VesselType,
        Self::YearBuilt,
        Self::Status,
        Self::StatusDate,
        Self::LastUpdate,
    ];

    /// Returns the merge precedence for this field.
    ///
    /// Only the status-like fields are refreshed by later tabs.
    pub fn precedence(self) -> MergePrecedence {
        match self {
            Self::Status | Self::StatusDate | Self::LastUpdate => MergePrecedence::LatestNonEmpty,
            _ => MergePrecedence::FirstNonEmpty,
        }
    }

    /// Returns a display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Imo => "IMO Number",
            Self::Name => "Name",
            Self::Flag => "Flag",
            Self::FlagCode => "Flag Code",
            Self::CallSign => "Call Sign",
            Self::Mmsi => "MMSI",
            Self::GrossTonnage => "Gross Tonnage",
            Self::Dwt => "DWT",
            Self::VesselType => "Type",
            Self::YearBuilt => "Year Built",
            Self::Status => "Status",
            Self::StatusDate => "Status Date",
            Self::LastUpdate => "Last Update",
        }
    }
}

// ============================================================================
// Vessel Identity
// ============================================================================

/// The identity block printed at the top of every vessel tab.
///
/// Every field is optional; absence is a normal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselIdentity {
    /// IMO number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imo: Option<String>,
    /// Vessel name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Flag state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Three-letter flag code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_code: Option<String>,
    /// Radio call sign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_sign: Option<String>,
    /// MMSI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mmsi: Option<String>,
    /// Gross tonnage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_tonnage: Option<String>,
    /// Deadweight tonnage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dwt: Option<String>,
    /// Type of ship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_type: Option<String>,
    /// Year of build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<String>,
    /// Ship status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// When the status took effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_date: Option<String>,
    /// Date of the last record update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

impl VesselIdentity {
    /// Returns the value of a field, if present.
    pub fn get(&self, field: IdentityField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Sets a field. Blank values are ignored.
    pub fn set(&mut self, field: IdentityField, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            *self.slot_mut(field) = Some(trimmed.to_string());
        }
    }

    /// Returns true if the identity can anchor a profile (IMO and name set).
    pub fn is_anchored(&self) -> bool {
        self.imo.is_some() && self.name.is_some()
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        IdentityField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    fn slot(&self, field: IdentityField) -> &Option<String> {
        match field {
            IdentityField::Imo => &self.imo,
            IdentityField::Name => &self.name,
            IdentityField::Flag => &self.flag,
            IdentityField::FlagCode => &self.flag_code,
            IdentityField::CallSign => &self.call_sign,
            IdentityField::Mmsi => &self.mmsi,
            IdentityField::GrossTonnage => &self.gross_tonnage,
            IdentityField::Dwt => &self.dwt,
            IdentityField::VesselType => &self.vessel_type,
            IdentityField::YearBuilt => &self.year_built,
            IdentityField::Status => &self.status,
            IdentityField::StatusDate => &self.status_date,
            IdentityField::LastUpdate => &self.last_update,
        }
    }

    fn slot_mut(&mut self, field: IdentityField) -> &mut Option<String> {
        match field {
            IdentityField::Imo => &mut self.imo,
            IdentityField::Name => &mut self.name,
            IdentityField::Flag => &mut self.flag,
            IdentityField::FlagCode => &mut self.flag_code,
            IdentityField::CallSign => &mut self.call_sign,
            IdentityField::Mmsi => &mut self.mmsi,
            IdentityField::GrossTonnage => &mut self.gross_tonnage,
            IdentityField::Dwt => &mut self.dwt,
            IdentityField::VesselType => &mut self.vessel_type,
            IdentityField::YearBuilt => &mut self.year_built,
            IdentityField::Status => &mut self.status,
            IdentityField::StatusDate => &mut self.status_date,
            IdentityField::LastUpdate => &mut self.last_update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_order_starts_with_primary() {
        assert!(TabKind::ORDER[0].is_primary());
        assert!(!TabKind::Inspections.is_primary());
        assert_eq!(TabKind::ShipHistory.to_string(), "ship_history");
    }

    #[test]
    fn test_status_fields_are_refreshed() {
        assert_eq!(IdentityField::Status.precedence(), MergePrecedence::LatestNonEmpty);
        assert_eq!(IdentityField::LastUpdate.precedence(), MergePrecedence::LatestNonEmpty);
        assert_eq!(IdentityField::Name.precedence(), MergePrecedence::FirstNonEmpty);
        assert_eq!(IdentityField::Flag.precedence(), MergePrecedence::FirstNonEmpty);
    }

    #[test]
    fn test_set_ignores_blank_values() {
        let mut identity = VesselIdentity::default();
        identity.set(IdentityField::Name, "  EMMA MAERSK ");
        identity.set(IdentityField::Name, "   ");
        assert_eq!(identity.get(IdentityField::Name), Some("EMMA MAERSK"));
        assert!(!identity.is_anchored());

        identity.set(IdentityField::Imo, "9321483");
        assert!(identity.is_anchored());
    }

    #[test]
    fn test_is_empty() {
        let mut identity = VesselIdentity::default();
        assert!(identity.is_empty());
        identity.set(IdentityField::Mmsi, "219018271");
        assert!(!identity.is_empty());
    }
}
