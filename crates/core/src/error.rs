//! Error types for the niagate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the pipeline decides how
//! each one degrades into a reply.

use thiserror::Error;

/// Structural request errors: caller-contract violations.
///
/// These are the only failures surfaced to the client as non-200
/// responses. Each carries a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("request body is not valid JSON")]
    InvalidJson,

    #[error("request body must be a JSON object")]
    InvalidBody,

    #[error("message is missing or empty")]
    EmptyMessage,
}

impl RequestError {
    /// The machine-readable code sent in the error payload.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidBody => "INVALID_BODY",
            Self::EmptyMessage => "EMPTY_MESSAGE",
        }
    }
}

/// Curriculum data-store failures.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Corrupt record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Completion backend failures. None of these are retried.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_codes_are_stable() {
        assert_eq!(RequestError::MethodNotAllowed.code(), "METHOD_NOT_ALLOWED");
        assert_eq!(RequestError::InvalidJson.code(), "INVALID_JSON");
        assert_eq!(RequestError::InvalidBody.code(), "INVALID_BODY");
        assert_eq!(RequestError::EmptyMessage.code(), "EMPTY_MESSAGE");
    }

    #[test]
    fn completion_error_displays_correctly() {
        let err = CompletionError::ApiError {
            status_code: 503,
            message: "overloaded".into(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn store_error_displays_key() {
        let err = StoreError::CorruptRecord {
            key: "wakeup_7_days/3".into(),
            reason: "bad somatic_ref".into(),
        };
        assert!(err.to_string().contains("wakeup_7_days/3"));
    }
}
