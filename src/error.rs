//! Error types for issues-dl
//!
//! The error taxonomy mirrors how failures propagate through the download
//! engine:
//! - Transport and transient API errors are retried internally and only
//!   surfaced once the retry budget is exhausted.
//! - Permanent API errors and database errors propagate immediately and
//!   abort the run, leaving the store consistent and resumable.

use thiserror::Error;

/// Result type alias for issues-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for issues-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure (DNS, connection reset, timeout)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 5xx or 429 - expected to resolve itself on retry
    #[error("transient API error (HTTP {status}): {body}")]
    TransientApi {
        /// HTTP status code of the response
        status: u16,
        /// Response body, captured for diagnostics
        body: String,
    },

    /// HTTP 4xx other than 429 - retrying will not fix it
    #[error("permanent API error (HTTP {status}): {body}")]
    PermanentApi {
        /// HTTP status code of the response
        status: u16,
        /// Response body, captured so the caller can act on the server's
        /// error detail
        body: String,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Repository reference was not in `owner/repo` form
    #[error("invalid repository: {0} (expected 'owner/repo')")]
    InvalidRepository(String),

    /// Malformed API payload
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unparsable URL (misconfigured API base, or a bad link in a payload)
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// I/O error (export file writes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Download interrupted between steps; already-committed issues remain
    /// resumable
    #[error("download cancelled")]
    Cancelled,
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to the store
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started, committed, or rolled back
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
}

impl Error {
    /// The HTTP status carried by an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::TransientApi { status, .. } | Error::PermanentApi { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_api_error_displays_captured_body() {
        let err = Error::PermanentApi {
            status: 404,
            body: r#"{"message":"Not Found"}"#.to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("404"));
        assert!(rendered.contains("Not Found"));
    }

    #[test]
    fn status_is_exposed_for_api_errors_only() {
        let transient = Error::TransientApi {
            status: 503,
            body: String::new(),
        };
        assert_eq!(transient.status(), Some(503));

        let db = Error::Database(DatabaseError::QueryFailed("boom".to_string()));
        assert_eq!(db.status(), None);
    }
}
