//! Error classification and the failure taxonomy.
//!
//! Two views of the same failures live here:
//!
//! - [`ErrorClass`] answers "may this be retried?" and drives the retry policy.
//! - [`FailureKind`] answers "what went wrong?" and is what callers render.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error Class
// ============================================================================

/// Retry classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Connection refused, timeout, DNS failure, premature close.
    NetworkTransient,
    /// Overload or gateway status codes from the remote side.
    ServerTransient,
    /// The request itself is wrong (bad credentials, missing key, 4xx).
    ClientPermanent,
    /// Anything not covered above.
    Unknown,
}

impl ErrorClass {
    /// Returns true if a request failing with this class may be retried.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::NetworkTransient | Self::ServerTransient)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NetworkTransient => "network_transient",
            Self::ServerTransient => "server_transient",
            Self::ClientPermanent => "client_permanent",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Failure Kind
// ============================================================================

/// Terminal failure categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network trouble that outlasted the retry budget.
    Network,
    /// Server overload that outlasted the retry budget.
    Server,
    /// Invalid credentials or repeated session expiry.
    Authentication,
    /// The remote source reports the key does not exist.
    NotFound,
    /// The key failed the syntactic precheck.
    MalformedInput,
    /// The document is not the expected page at all.
    Extraction,
    /// Unclassified failure.
    Unknown,
}

impl FailureKind {
    /// Returns the retry class this failure kind maps onto.
    pub fn class(self) -> ErrorClass {
        match self {
            Self::Network => ErrorClass::NetworkTransient,
            Self::Server => ErrorClass::ServerTransient,
            Self::Authentication | Self::NotFound | Self::MalformedInput | Self::Extraction => {
                ErrorClass::ClientPermanent
            }
            Self::Unknown => ErrorClass::Unknown,
        }
    }

    /// Returns true if this failure must stop a whole batch.
    ///
    /// Without a valid session no further key can succeed.
    pub fn aborts_batch(self) -> bool {
        self == Self::Authentication
    }

    /// Short guidance for the user.
    pub fn hint(self) -> &'static str {
        match self {
            Self::Network | Self::Server => "retry later",
            Self::Authentication => "check credentials",
            Self::NotFound => "check the key; the remote source has no such entry",
            Self::MalformedInput => "check the key format",
            Self::Extraction => "the page layout may have changed",
            Self::Unknown => "re-run with --verbose for details",
        }
    }

    /// Returns a stable lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Server => "server",
            Self::Authentication => "authentication",
            Self::NotFound => "not_found",
            Self::MalformedInput => "malformed_input",
            Self::Extraction => "extraction",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Failure
// ============================================================================

/// A terminal failure recorded in an outcome.
///
/// This is a plain value (not a live error) so outcomes stay cloneable and
/// serializable for output layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable message.
    pub message: String,
}

impl Failure {
    /// Creates a new failure.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the retry class of this failure.
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

// ============================================================================
// Core Error
// ============================================================================

/// Errors raised by core checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The IMO number is not seven digits.
    #[error("Invalid IMO number: {0:?} (expected 7 digits)")]
    InvalidImo(String),

    /// The company name is empty, too long, or contains control characters.
    #[error("Invalid company name: {0:?}")]
    InvalidCompany(String),

    /// The vessel name is empty, too long, or contains control characters.
    #[error("Invalid vessel name: {0:?}")]
    InvalidName(String),
}

impl From<CoreError> for Failure {
    fn from(err: CoreError) -> Self {
        Failure::new(FailureKind::MalformedInput, err.to_string())
    }
}
