//! Company fleet and name-search rows.

use serde::{Deserialize, Serialize};

/// One vessel row from a fleet listing or a name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselSummary {
    /// IMO number.
    pub imo: String,
    /// Vessel name.
    pub name: String,
    /// Gross tonnage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_tonnage: Option<String>,
    /// Type of ship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_type: Option<String>,
    /// Year of build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<String>,
    /// Flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Vessels associated with one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetProfile {
    /// Company name or identifier as queried.
    pub company: String,
    /// Vessels listed for the company.
    pub vessels: Vec<VesselSummary>,
    /// Number of vessels.
    pub total_vessels: usize,
}

impl FleetProfile {
    /// Creates a fleet profile, deriving the vessel count.
    pub fn new(company: impl Into<String>, vessels: Vec<VesselSummary>) -> Self {
        let total_vessels = vessels.len();
        Self {
            company: company.into(),
            vessels,
            total_vessels,
        }
    }
}
