use thiserror::Error;

/// Top-level error type for the `labelkit-api` crate.
///
/// Covers every failure mode of the adapter: transport, authentication,
/// server-reported rejections, decoding, and token storage.
/// `labelkit-core` maps these into user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server answered `401 Unauthorized`. The stored token has
    /// already been cleared by the time the caller sees this.
    #[error("Unauthorized: {}", detail.as_deref().unwrap_or("authentication required"))]
    Unauthorized { detail: Option<String> },

    /// An operation needed a token but none is stored.
    #[error("No authentication token available")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request exceeded the configured timeout ceiling.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Server ──────────────────────────────────────────────────────
    /// Non-success status other than 401, with the `detail` field if
    /// the body carried one.
    #[error("API error (HTTP {status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Storage ─────────────────────────────────────────────────────
    /// The durable token store could not be read or written.
    #[error("Token storage error: {0}")]
    Storage(String),
}

/// Coarse classification of an [`Error`], used to pick the message a user
/// sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeout, unreachable host, bad URL.
    Transport,
    /// 401 or a missing token.
    Authentication,
    /// 4xx with a server-provided explanation.
    Validation,
    /// 5xx, malformed body, local storage failure.
    Server,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } | Self::NotAuthenticated => ErrorKind::Authentication,
            Self::Transport(e) if e.is_decode() => ErrorKind::Server,
            Self::Transport(_) | Self::InvalidUrl(_) | Self::Timeout { .. } => ErrorKind::Transport,
            Self::Api { status, .. } if (400..500).contains(status) => ErrorKind::Validation,
            Self::Api { .. } | Self::Deserialization { .. } | Self::Storage(_) => ErrorKind::Server,
        }
    }

    /// The human-readable `detail` the server attached to the response, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the error means the session is no longer valid.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::NotAuthenticated)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
