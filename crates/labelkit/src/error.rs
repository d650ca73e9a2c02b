//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use labelkit_config::ConfigError;
use labelkit_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(labelkit::connection_failed),
        help(
            "Could not reach the label service ({reason}).\n\
             Check that it is running, or point at it with --api-url."
        )
    )]
    ConnectionFailed { message: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(labelkit::auth_failed),
        help("Sign in again with: labelkit login")
    )]
    AuthFailed { message: String },

    #[error("'{command}' requires a signed-in session")]
    #[diagnostic(code(labelkit::login_required), help("Run: labelkit login"))]
    LoginRequired { command: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(labelkit::not_found),
        help("Run: labelkit {list_command} to see available IDs")
    )]
    NotFound {
        message: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(labelkit::rejected))]
    Rejected { message: String, status: u16 },

    #[error("{message}")]
    #[diagnostic(code(labelkit::server_error), help("Service reported: {reason}"))]
    ServerError { message: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(labelkit::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(labelkit::config),
        help("Inspect the resolved settings with: labelkit config show")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(labelkit::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("{message} (timed out after {seconds}s)")]
    #[diagnostic(
        code(labelkit::timeout),
        help("Increase timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout { message: String, seconds: u64 },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(labelkit::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::LoginRequired { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            Self::ServerError { .. } | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Authentication { message } => Self::AuthFailed { message },
            CoreError::NotFound { message } => Self::NotFound {
                message,
                list_command: "labels list".into(),
            },
            CoreError::Rejected { message, status } => Self::Rejected { message, status },
            CoreError::Timeout {
                message,
                timeout_secs,
            } => Self::Timeout {
                message,
                seconds: timeout_secs,
            },
            CoreError::Connection { message, reason } => Self::ConnectionFailed { message, reason },
            CoreError::Server { message, reason } => Self::ServerError { message, reason },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::Authentication {
                    message: "expired".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::NotFound {
                    message: "Label not found".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Timeout {
                    message: "Failed to load labels".into(),
                    timeout_secs: 10,
                },
                exit_code::TIMEOUT,
            ),
            (
                CoreError::Connection {
                    message: "Login failed".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn server_message_is_the_headline() {
        let err = CliError::from(CoreError::Rejected {
            message: "Email already registered".into(),
            status: 400,
        });
        assert_eq!(err.to_string(), "Email already registered");
    }
}
