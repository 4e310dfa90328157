//! Fetch error types.

use equasis_core::{ErrorClass, Failure, FailureKind};
use thiserror::Error;

/// Status codes treated as transient server trouble.
///
/// 520-524 are the upstream gateway codes returned by the CDN in front of
/// the portal.
const SERVER_TRANSIENT_STATUSES: &[u16] = &[429, 500, 502, 503, 504, 520, 521, 522, 523, 524];

// ============================================================================
// Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, timeout, DNS failure, premature close.
    #[error("Network error: {0}")]
    Network(String),

    /// Overload or gateway status from the remote side.
    #[error("Server error: HTTP {status}")]
    Server {
        /// HTTP status code.
        status: u16,
    },

    /// Invalid credentials, or the session expired again after re-login.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The response is the login page instead of the requested document.
    #[error("Session expired")]
    SessionExpired,

    /// The remote source reports that the entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other 4xx status.
    #[error("Client error: HTTP {status}")]
    Client {
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be built (bad base URL, bad path).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Anything else.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl FetchError {
    /// Maps a non-success HTTP status onto an error.
    ///
    /// Returns `None` for 2xx and 3xx statuses.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=399 => None,
            401 | 403 => Some(Self::Authentication(format!("HTTP {status}"))),
            404 => Some(Self::NotFound(format!("HTTP {status}"))),
            s if SERVER_TRANSIENT_STATUSES.contains(&s) => Some(Self::Server { status: s }),
            400..=499 => Some(Self::Client { status }),
            _ => Some(Self::Unexpected(format!("HTTP {status}"))),
        }
    }

    /// Returns the retry classification.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Network(_) => ErrorClass::NetworkTransient,
            Self::Server { .. } => ErrorClass::ServerTransient,
            Self::Authentication(_)
            | Self::SessionExpired
            | Self::NotFound(_)
            | Self::Client { .. }
            | Self::InvalidRequest(_) => ErrorClass::ClientPermanent,
            Self::Unexpected(_) => ErrorClass::Unknown,
        }
    }

    /// Returns the failure kind surfaced to callers.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Network,
            Self::Server { .. } => FailureKind::Server,
            Self::Authentication(_) | Self::SessionExpired => FailureKind::Authentication,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::InvalidRequest(_) => FailureKind::MalformedInput,
            Self::Client { .. } | Self::Unexpected(_) => FailureKind::Unknown,
        }
    }

    /// Converts into a serializable failure record.
    pub fn to_failure(&self) -> Failure {
        Failure::new(self.kind(), self.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return Self::InvalidRequest(err.to_string());
        }
        if let Some(status) = err.status().and_then(|s| Self::from_status(s.as_u16())) {
            return status;
        }
        // Connect, timeout, body and decode errors all mean the exchange
        // did not complete.
        Self::Network(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<FetchError> for Failure {
    fn from(err: FetchError) -> Self {
        err.to_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses_are_not_errors() {
        assert!(FetchError::from_status(200).is_none());
        assert!(FetchError::from_status(302).is_none());
    }

    #[test]
    fn test_transient_statuses() {
        for status in [429, 500, 502, 503, 504, 520, 524] {
            let err = FetchError::from_status(status).unwrap();
            assert_eq!(err.class(), ErrorClass::ServerTransient, "status {status}");
            assert_eq!(err.kind(), FailureKind::Server);
        }
    }

    #[test]
    fn test_permanent_statuses() {
        let err = FetchError::from_status(404).unwrap();
        assert_eq!(err.kind(), FailureKind::NotFound);
        assert_eq!(err.class(), ErrorClass::ClientPermanent);

        let err = FetchError::from_status(401).unwrap();
        assert_eq!(err.kind(), FailureKind::Authentication);

        let err = FetchError::from_status(400).unwrap();
        assert_eq!(err, FetchError::Client { status: 400 });
        assert!(!err.class().is_retryable());
    }

    #[test]
    fn test_network_is_retryable() {
        let err = FetchError::Network("connection reset".to_string());
        assert!(err.class().is_retryable());
        assert_eq!(err.to_failure().kind, FailureKind::Network);
    }

    #[test]
    fn test_session_expired_surfaces_as_authentication() {
        assert_eq!(FetchError::SessionExpired.kind(), FailureKind::Authentication);
        assert!(!FetchError::SessionExpired.class().is_retryable());
    }
}
