// ── Runtime session configuration ──
//
// Describes where the service lives and how the stores should behave.
// Never touches disk: the CLI builds a `SessionConfig` from its own
// config layer and hands it in.

use std::time::Duration;

use labelkit_api::{TransportConfig, DEFAULT_TIMEOUT};
use url::Url;

use crate::messages::Locale;

/// Settings for one [`SessionContext`](crate::SessionContext).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Service root, e.g. `http://localhost:8000`.
    pub base_url: Url,
    /// Ceiling for every request.
    pub timeout: Duration,
    /// Language for fallback error messages.
    pub locale: Locale,
}

impl SessionConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            locale: Locale::default(),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::new(self.base_url.clone()).with_timeout(self.timeout)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(TransportConfig::default().base_url)
    }
}
