//! Collection error types.

use equasis_core::{CoreError, Failure, FailureKind};
use equasis_fetch::FetchError;
use thiserror::Error;

// ============================================================================
// Extract Error
// ============================================================================

/// Error type for document extraction.
///
/// A missing field is never an error; these are raised only when the
/// document is not the expected page at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The page says the entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The page lacks the block every expected page carries.
    #[error("Unexpected document: {0}")]
    UnexpectedDocument(String),
}

impl ExtractError {
    /// Returns the failure kind surfaced to callers.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::UnexpectedDocument(_) => FailureKind::Extraction,
        }
    }
}

// ============================================================================
// Collect Error
// ============================================================================

/// Error type for collecting one entity or one tab.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectError {
    /// The key failed its precheck.
    #[error(transparent)]
    Key(#[from] CoreError),

    /// Fetching failed after retries.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched page could not be extracted.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl CollectError {
    /// Returns the failure kind surfaced to callers.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Key(_) => FailureKind::MalformedInput,
            Self::Fetch(e) => e.kind(),
            Self::Extract(e) => e.kind(),
        }
    }

    /// Converts into a serializable failure record.
    pub fn to_failure(&self) -> Failure {
        Failure::new(self.kind(), self.to_string())
    }
}

impl From<CollectError> for Failure {
    fn from(err: CollectError) -> Self {
        err.to_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            CollectError::from(ExtractError::NotFound("x".into())).kind(),
            FailureKind::NotFound
        );
        assert_eq!(
            CollectError::from(ExtractError::UnexpectedDocument("x".into())).kind(),
            FailureKind::Extraction
        );
        assert_eq!(
            CollectError::from(FetchError::Server { status: 503 }).kind(),
            FailureKind::Server
        );
        assert_eq!(
            CollectError::from(CoreError::InvalidImo("1".into())).kind(),
            FailureKind::MalformedInput
        );
    }

    #[test]
    fn test_failure_message_is_transparent() {
        let failure = CollectError::from(FetchError::Server { status: 503 }).to_failure();
        assert_eq!(failure.message, "Server error: HTTP 503");
    }
}
