/*
[INPUT]:  Error sources (HTTP, backend status, serialization, storage, auth)
[OUTPUT]: Structured error types with status context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the login adapter
#[derive(Error, Debug)]
pub enum LoginError {
    /// Transport-level failure (connection refused, TLS, body read)
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    /// generate_challenge answered with a non-2xx status
    #[error("Failed to fetch nonce (status {status}): {message}")]
    NonceFetch { status: u16, message: String },

    /// submit_challenge answered with a non-2xx status
    #[error("Signature verification failed (status {status}): {message}")]
    Verification { status: u16, message: String },

    /// Serialization/deserialization failed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Local store could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// JWT could not be decoded
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Signature parts are malformed
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation belongs to an auth flow that is not the active one
    #[error("Auth flow '{0}' is not active")]
    FlowInactive(String),
}

impl LoginError {
    /// Check if error indicates the backend rejected an auth step
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LoginError::NonceFetch { .. }
                | LoginError::Verification { .. }
                | LoginError::InvalidToken(_)
                | LoginError::InvalidSignature(_)
        )
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            LoginError::Http { status, .. }
            | LoginError::NonceFetch { status, .. }
            | LoginError::Verification { status, .. } => Some(*status),
            LoginError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Create an HTTP error from status code and message
    pub fn http_error(status: StatusCode, message: impl Into<String>) -> Self {
        LoginError::Http {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for login operations
pub type Result<T> = std::result::Result<T, LoginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_auth_error() {
        let nonce = LoginError::NonceFetch {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(nonce.is_auth_error());
        assert!(LoginError::InvalidToken("x".to_string()).is_auth_error());
        assert!(!LoginError::Config("x".to_string()).is_auth_error());
    }

    #[test]
    fn test_http_error_creation() {
        let err = LoginError::http_error(StatusCode::BAD_REQUEST, "bad address");
        match &err {
            LoginError::Http { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "bad address");
            }
            _ => panic!("Expected Http error variant"),
        }
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_status_absent_for_local_errors() {
        assert_eq!(LoginError::FlowInactive("jwt-link".to_string()).status(), None);
    }
}
