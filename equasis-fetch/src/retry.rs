//! Retry policy for outbound requests.
//!
//! The policy only decides; the caller performs the wait. That keeps the
//! decision testable without real time passing.

use std::time::Duration;

use equasis_core::ErrorClass;
use rand::Rng;

/// Retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Growth factor between consecutive delays.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;
/// Upper bound on the nominal delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
/// Relative jitter applied to each delay (0.25 means plus or minus 25%).
pub const DEFAULT_JITTER: f64 = 0.25;

// ============================================================================
// Retry Decision
// ============================================================================

/// Outcome of consulting the policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryDecision {
    /// Wait for `delay`, then try again.
    Retry {
        /// How long to wait before the next attempt.
        delay: Duration,
    },
    /// Surface the failure.
    GiveUp,
}

impl RetryDecision {
    /// Returns true if the caller should retry.
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }

    /// Returns the wait before the next attempt, if retrying.
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Self::Retry { delay } => Some(*delay),
            Self::GiveUp => None,
        }
    }
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Bounded exponential backoff with jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Cap on the nominal (pre-jitter) delay.
    pub max_delay: Duration,
    /// Relative jitter in `[0, 1]`.
    pub jitter: f64,
}

impl RetryPolicy {
    /// Creates a policy with the given retry budget and default timing.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0)
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the backoff multiplier. Values below 1.0 are raised to 1.0.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = if multiplier.is_finite() {
            multiplier.max(1.0)
        } else {
            DEFAULT_MULTIPLIER
        };
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the relative jitter, clamped to `[0, 1]`.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = if jitter.is_finite() {
            jitter.clamp(0.0, 1.0)
        } else {
            DEFAULT_JITTER
        };
        self
    }

    /// Total tries including the initial one.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Decides what to do after attempt number `attempt` (starting at 1)
    /// failed with `class`.
    pub fn decide(&self, attempt: u32, class: ErrorClass) -> RetryDecision {
        self.decide_with(attempt, class, &mut rand::thread_rng())
    }

    /// Same as [`decide`](Self::decide) with an explicit random source.
    pub fn decide_with<R: Rng + ?Sized>(
        &self,
        attempt: u32,
        class: ErrorClass,
        rng: &mut R,
    ) -> RetryDecision {
        if !class.is_retryable() || attempt == 0 || attempt > self.max_retries {
            return RetryDecision::GiveUp;
        }

        let nominal = self.nominal_delay(attempt).as_secs_f64();
        let jitter = if self.jitter.is_finite() {
            self.jitter.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let factor = if jitter > 0.0 {
            rng.gen_range((1.0 - jitter)..=(1.0 + jitter))
        } else {
            1.0
        };

        RetryDecision::Retry {
            delay: Duration::from_secs_f64((nominal * factor).max(0.0)),
        }
    }

    /// Delay before jitter: `base * multiplier^(attempt - 1)`, capped.
    ///
    /// A zero base delay stays zero at every attempt.
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let raw = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let cap = self.max_delay.as_secs_f64();

        if raw.is_finite() && raw < cap {
            Duration::from_secs_f64(raw.max(0.0))
        } else {
            self.max_delay
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: DEFAULT_MAX_DELAY,
            jitter: DEFAULT_JITTER,
        }
    }
}
