// ── Core error types ──
//
// User-facing errors from labelkit-core. Every variant carries the
// message a UI should show: the server's `detail` when it sent one,
// otherwise the localized fallback for the failed action. The raw
// transport error is kept only as a `reason` string for logs.

use labelkit_api::ErrorKind;
use thiserror::Error;

/// Unified error type for store actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Credentials rejected, session expired, or no token available.
    #[error("{message}")]
    Authentication { message: String },

    /// The requested record does not exist (HTTP 404).
    #[error("{message}")]
    NotFound { message: String },

    /// The server refused the request (4xx other than 401/404).
    #[error("{message}")]
    Rejected { message: String, status: u16 },

    /// The request exceeded the timeout ceiling.
    #[error("{message}")]
    Timeout { message: String, timeout_secs: u64 },

    /// The service could not be reached.
    #[error("{message}")]
    Connection { message: String, reason: String },

    /// 5xx, malformed response, or local storage failure.
    #[error("{message}")]
    Server { message: String, reason: String },

    /// The session context could not be built.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Translate an adapter error, preferring the server's `detail` over
    /// `fallback` where the taxonomy allows it.
    pub fn from_api(err: &labelkit_api::Error, fallback: &str) -> Self {
        let surfaced = || err.detail().unwrap_or(fallback).to_owned();
        match (err.kind(), err) {
            (_, labelkit_api::Error::Timeout { timeout_secs }) => Self::Timeout {
                message: fallback.to_owned(),
                timeout_secs: *timeout_secs,
            },
            (ErrorKind::Authentication, _) => Self::Authentication {
                message: surfaced(),
            },
            (ErrorKind::Validation, _) if err.is_not_found() => Self::NotFound {
                message: surfaced(),
            },
            (ErrorKind::Validation, _) => Self::Rejected {
                message: surfaced(),
                status: err.status().unwrap_or(400),
            },
            (ErrorKind::Transport, _) => Self::Connection {
                message: fallback.to_owned(),
                reason: err.to_string(),
            },
            (ErrorKind::Server, _) => Self::Server {
                message: fallback.to_owned(),
                reason: err.to_string(),
            },
        }
    }

    /// The message to show the user.
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message }
            | Self::NotFound { message }
            | Self::Rejected { message, .. }
            | Self::Timeout { message, .. }
            | Self::Connection { message, .. }
            | Self::Server { message, .. }
            | Self::Config { message } => message,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
