// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Equasis Core
//!
//! Core types and models shared by every Equasis crate.
//!
//! This crate holds plain value types only. Nothing here performs I/O:
//!
//! - Domain models (vessel identity, per-tab sections, merged profiles)
//! - Per-key and per-batch outcomes consumed by output layers
//! - Error classification and the failure taxonomy
//! - Cheap syntactic prechecks for entity keys
//!
//! ## Key Types
//!
//! ### Records
//! - [`TabKind`] - The three vessel pages fetched per IMO
//! - [`VesselIdentity`] - Scalar identity block present on every tab
//! - [`PartialRecord`] - What one tab contributes before merging
//! - [`VesselProfile`] - The merged, canonical view of a vessel
//! - [`FleetProfile`] - Vessels managed by one company
//!
//! ### Outcomes
//! - [`OperationOutcome`] - Result of collecting one entity key
//! - [`BatchSummary`] - Aggregate over a batch of outcomes
//!
//! ### Errors
//! - [`ErrorClass`] - Retry classification
//! - [`FailureKind`] / [`Failure`] - Terminal failure taxonomy

pub mod error;
pub mod key;
pub mod models;

pub use error::{CoreError, ErrorClass, Failure, FailureKind};
pub use key::{normalize_company, normalize_imo, normalize_vessel_name, parse_key_list};

pub use models::{
    // Tabs & identity
    IdentityField,
    MergePrecedence,
    TabKind,
    VesselIdentity,
    // Sections
    ClassificationEntry,
    CompanyEntry,
    GeoEntry,
    HistoricalCompany,
    HistoricalFlag,
    HistoricalName,
    HistorySections,
    InspectionEntry,
    ListColor,
    Overview,
    ShipInfoSections,
    UscgTargeting,
    // Records
    FieldConflict,
    PartialRecord,
    TabContent,
    VesselProfile,
    // Fleet
    FleetProfile,
    VesselSummary,
    // Outcomes
    BatchSummary,
    OperationOutcome,
    TabFailure,
};
