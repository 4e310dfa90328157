//! Domain models for Equasis lookups.
//!
//! ## Submodules
//!
//! - [`tab`] - Tab kinds and the identity block (`TabKind`, `VesselIdentity`)
//! - [`sections`] - Per-tab list sections (management, inspections, history...)
//! - [`record`] - `PartialRecord` and the merged `VesselProfile`
//! - [`fleet`] - Company fleet and name-search rows
//! - [`outcome`] - Per-key outcomes and batch summaries

pub mod fleet;
pub mod outcome;
pub mod record;
pub mod sections;
pub mod tab;

pub use fleet::{FleetProfile, VesselSummary};
pub use outcome::{BatchSummary, OperationOutcome, TabFailure};
pub use record::{FieldConflict, PartialRecord, TabContent, VesselProfile};
pub use sections::{
    ClassificationEntry, CompanyEntry, GeoEntry, HistoricalCompany, HistoricalFlag,
    HistoricalName, HistorySections, InspectionEntry, ListColor, Overview, ShipInfoSections,
    UscgTargeting,
};
pub use tab::{IdentityField, MergePrecedence, TabKind, VesselIdentity};
