//! CLI-side configuration: `GlobalOpts` overrides layered over the shared
//! config, and construction of the session context.

use std::str::FromStr;

use labelkit_config::{self as config, Config};
use labelkit_core::{Locale, SessionContext};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the config file and apply command-line overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = config::load_config()?;

    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if let Some(ref locale) = global.locale {
        cfg.locale = Locale::from_str(locale).map_err(|_| CliError::Validation {
            field: "locale".into(),
            reason: format!("expected 'en' or 'id', got '{locale}'"),
        })?;
    }
    Ok(cfg)
}

/// Build the session graph for this invocation. A token persisted by an
/// earlier `login` makes it start authenticated.
pub fn build_context(global: &GlobalOpts) -> Result<SessionContext, CliError> {
    let cfg = resolve(global)?;
    let session_config = cfg.session_config()?;
    let tokens = config::resolve_token_store(&cfg);
    tracing::debug!(api_url = %session_config.base_url, "building session context");
    Ok(SessionContext::new(&session_config, tokens)?)
}
