//! Fetch context bundling settings and host APIs.
//!
//! The context is handed to the session gateway once; everything that
//! touches the network or the clock goes through it.

use std::sync::Arc;
use std::time::Duration;

use crate::error::FetchError;
use crate::host::{
    http::{ReqwestTransport, Transport},
    sleep::{Sleeper, TokioSleeper},
};
use crate::retry::RetryPolicy;

/// Default portal location.
pub const DEFAULT_BASE_URL: &str = "https://www.equasis.org";

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    /// Portal base URL.
    pub base_url: String,
    /// Transport-level request timeout.
    pub timeout: Duration,
    /// Retry policy wrapped around every request.
    pub retry: RetryPolicy,
    /// Pause between the tab fetches of one entity.
    pub tab_pause: Duration,
    /// Pause between entities in a batch.
    pub entity_pause: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            tab_pause: Duration::from_secs(1),
            entity_pause: Duration::from_secs(1),
        }
    }
}

impl FetchSettings {
    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets both pacing pauses.
    pub fn with_pacing(mut self, tab_pause: Duration, entity_pause: Duration) -> Self {
        self.tab_pause = tab_pause;
        self.entity_pause = entity_pause;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Host APIs and settings used by the session gateway.
pub struct FetchContext {
    /// HTTP transport.
    pub transport: Arc<dyn Transport>,
    /// Suspension for backoff and pacing.
    pub sleeper: Arc<dyn Sleeper>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with the default host implementations.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(FetchSettings::default())
    }

    /// Creates a context with custom settings.
    pub fn with_settings(settings: FetchSettings) -> Result<Self, FetchError> {
        Self::builder().settings(settings).build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for [`FetchContext`].
#[derive(Default)]
pub struct FetchContextBuilder {
    transport: Option<Arc<dyn Transport>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom sleeper.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the context.
    ///
    /// Without an explicit transport a reqwest transport is created for the
    /// configured base URL, which fails if the URL does not parse.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(
                &self.settings.base_url,
                self.settings.timeout,
            )?),
        };

        Ok(FetchContext {
            transport,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            settings: self.settings,
        })
    }
}
