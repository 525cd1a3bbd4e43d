//! Error types for curio-core

use thiserror::Error;

/// Result type alias using curio-core's `ApiError`
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors produced by the remote collection client and its consumers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, expired, or rejected bearer token. Fatal to the session;
    /// the core never retries these.
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// The backend refused a create because an equivalent quote already
    /// exists. Expected outcome in batch contexts, not a hard error.
    #[error("Duplicate rejected by backend: {0}")]
    Conflict(String),

    /// The referenced quote does not exist
    #[error("Quote not found: {0}")]
    NotFound(String),

    /// Malformed input caught before any network call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response outside the recognized taxonomy
    #[error("API error: {message} ({status})")]
    Api { status: u16, message: String },

    /// Response body did not decode into the expected shape
    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    /// Whether a caller may reasonably re-issue the same request.
    ///
    /// Transport errors and 5xx responses are transient; everything else
    /// needs operator intervention first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether this is the soft-duplicate outcome of a create call
    #[must_use]
    pub const fn is_soft_duplicate(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Whether this failure invalidates the whole session
    #[must_use]
    pub const fn is_session_fatal(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        let err = ApiError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = ApiError::Api {
            status: 400,
            message: "bad request".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(!ApiError::Conflict("dup".to_string()).is_retryable());
        assert!(!ApiError::Unauthenticated("no token".to_string()).is_retryable());
    }

    #[test]
    fn test_conflict_is_soft_duplicate() {
        assert!(ApiError::Conflict("dup".to_string()).is_soft_duplicate());
        assert!(!ApiError::NotFound("x".to_string()).is_soft_duplicate());
    }

    #[test]
    fn test_unauthenticated_is_session_fatal() {
        assert!(ApiError::Unauthenticated("expired".to_string()).is_session_fatal());
        assert!(!ApiError::Validation("empty".to_string()).is_session_fatal());
    }
}
