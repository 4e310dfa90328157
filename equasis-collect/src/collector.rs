//! Entity collectors.
//!
//! A collector turns one entity key into an [`OperationOutcome`]. Collectors
//! never return errors: every failure becomes a failed outcome carrying its
//! [`Failure`] classification.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use equasis_core::{
    Failure, FleetProfile, OperationOutcome, PartialRecord, TabFailure, TabKind, VesselProfile,
    normalize_company, normalize_imo,
};
use equasis_fetch::{FetchRequest, FetchSettings, SessionGateway};
use tracing::{debug, info, instrument, warn};

use crate::error::CollectError;
use crate::extract::{extract, extract_fleet};
use crate::merge::merge;

/// Default pause between the tab fetches of one vessel.
const DEFAULT_TAB_PAUSE: Duration = Duration::from_secs(1);

// ============================================================================
// Collector Trait
// ============================================================================

/// Collects one entity per call through the session gateway.
#[async_trait]
pub trait Collector: Send + Sync {
    /// The profile type produced on success.
    type Profile: Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Collects the entity addressed by `key`.
    ///
    /// A key that fails its precheck yields a `MalformedInput` outcome
    /// without any request being made.
    async fn collect(
        &self,
        gateway: &mut SessionGateway,
        key: &str,
    ) -> OperationOutcome<Self::Profile>;
}

// ============================================================================
// Vessel Collector
// ============================================================================

/// Collects a vessel profile from its three tabs.
///
/// Tabs are fetched in [`TabKind::ORDER`]. A failure on the ship info tab
/// fails the vessel; a failure on a later tab is recorded and the profile
/// is returned without that tab's sections.
#[derive(Debug, Clone)]
pub struct VesselCollector {
    tab_pause: Duration,
}

impl VesselCollector {
    /// Creates a collector with the default tab pause.
    pub fn new() -> Self {
        Self {
            tab_pause: DEFAULT_TAB_PAUSE,
        }
    }

    /// Creates a collector paced by the fetch settings.
    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self::new().with_tab_pause(settings.tab_pause)
    }

    /// Sets the pause between tab fetches.
    pub fn with_tab_pause(mut self, pause: Duration) -> Self {
        self.tab_pause = pause;
        self
    }

    async fn collect_tab(
        gateway: &mut SessionGateway,
        imo: &str,
        tab: TabKind,
    ) -> Result<PartialRecord, CollectError> {
        let document = gateway.fetch(&FetchRequest::ship_tab(tab, imo)).await?;
        let record = extract(&document, tab)?;

        if record.identity.imo.as_deref().is_some_and(|found| found != imo) {
            warn!(%tab, requested = imo, found = ?record.identity.imo, "Page shows another IMO");
        }
        Ok(record)
    }
}

impl Default for VesselCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Collector for VesselCollector {
    type Profile = VesselProfile;

    fn name(&self) -> &'static str {
        "vessel"
    }

    #[instrument(skip(self, gateway))]
    async fn collect(
        &self,
        gateway: &mut SessionGateway,
        key: &str,
    ) -> OperationOutcome<VesselProfile> {
        let started = Instant::now();
        let imo = match normalize_imo(key) {
            Ok(imo) => imo,
            Err(e) => return OperationOutcome::failed(key, e.into(), 0, started.elapsed()),
        };

        let requests_before = gateway.requests_sent();
        let mut profile = VesselProfile::new();
        let mut tab_failures = Vec::new();

        for (i, tab) in TabKind::ORDER.into_iter().enumerate() {
            if i > 0 {
                gateway.pause(self.tab_pause).await;
            }

            debug!(%tab, "Fetching tab");
            match Self::collect_tab(gateway, &imo, tab).await {
                Ok(record) => profile = merge(profile, record, tab),
                Err(err) => {
                    let failure = err.to_failure();
                    if tab.is_primary() || failure.kind.aborts_batch() {
                        warn!(%tab, error = %err, "Vessel failed");
                        let attempts = gateway.requests_sent() - requests_before;
                        return OperationOutcome::failed(key, failure, attempts, started.elapsed());
                    }
                    warn!(%tab, error = %err, "Tab failed, keeping partial profile");
                    tab_failures.push(TabFailure { tab, failure });
                }
            }
        }

        let attempts = gateway.requests_sent() - requests_before;
        info!(
            imo = %imo,
            name = profile.name().unwrap_or_default(),
            failed_tabs = tab_failures.len(),
            "Vessel collected"
        );
        OperationOutcome::succeeded(key, profile, tab_failures, attempts, started.elapsed())
    }
}

// ============================================================================
// Fleet Collector
// ============================================================================

/// Collects the vessels listed for a company.
#[derive(Debug, Clone, Default)]
pub struct FleetCollector;

impl FleetCollector {
    /// Creates a fleet collector.
    pub fn new() -> Self {
        Self
    }

    async fn fetch_fleet(
        gateway: &mut SessionGateway,
        company: &str,
    ) -> Result<FleetProfile, CollectError> {
        let document = gateway.fetch(&FetchRequest::company_fleet(company)).await?;
        Ok(extract_fleet(&document, company)?)
    }
}

#[async_trait]
impl Collector for FleetCollector {
    type Profile = FleetProfile;

    fn name(&self) -> &'static str {
        "fleet"
    }

    #[instrument(skip(self, gateway))]
    async fn collect(
        &self,
        gateway: &mut SessionGateway,
        key: &str,
    ) -> OperationOutcome<FleetProfile> {
        let started = Instant::now();
        let company = match normalize_company(key) {
            Ok(company) => company,
            Err(e) => return OperationOutcome::failed(key, e.into(), 0, started.elapsed()),
        };

        let requests_before = gateway.requests_sent();
        let result = Self::fetch_fleet(gateway, &company).await;
        let attempts = gateway.requests_sent() - requests_before;

        match result {
            Ok(fleet) => {
                info!(company = %company, vessels = fleet.total_vessels, "Fleet collected");
                OperationOutcome::succeeded(key, fleet, Vec::new(), attempts, started.elapsed())
            }
            Err(err) => {
                warn!(company = %company, error = %err, "Fleet failed");
                let failure: Failure = err.into();
                OperationOutcome::failed(key, failure, attempts, started.elapsed())
            }
        }
    }
}
