//! Shared configuration for labelkit tools.
//!
//! TOML config file, `LABELKIT_*` environment overrides, token storage
//! selection (plain file or system keyring), and translation to
//! `labelkit_core::SessionConfig`. The CLI layers its flags on top.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use labelkit_api::{FileTokenStore, TOKEN_KEY, TokenStore};
use labelkit_core::{Locale, SessionConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Keyring service name the token is filed under.
pub const KEYRING_SERVICE: &str = "labelkit";

/// Environment variable that points at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "LABELKIT_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Label service root URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Language for fallback error messages.
    #[serde(default)]
    pub locale: Locale,

    /// Output defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Where the session token is kept.
    #[serde(default)]
    pub token: TokenConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            locale: Locale::default(),
            defaults: Defaults::default(),
            token: TokenConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenConfig {
    #[serde(default)]
    pub storage: TokenStorage,

    /// Directory holding the token file. Defaults to the data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Durable token backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    #[default]
    File,
    Keyring,
}

fn default_api_url() -> String {
    labelkit_api::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    labelkit_api::DEFAULT_TIMEOUT.as_secs()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// Validate and translate into the core's runtime config.
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let base_url: url::Url = self
            .api_url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("invalid URL: {}", self.api_url),
            })?;
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(SessionConfig {
            base_url,
            timeout: Duration::from_secs(self.timeout),
            locale: self.locale,
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "labelkit", "labelkit")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("labelkit");
    p
}

/// Resolve the config file path: `LABELKIT_CONFIG`, else XDG / platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for durable client data (the token file).
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `LABELKIT_*` variables.
/// Nested keys use a double underscore: `LABELKIT_TOKEN__STORAGE`.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LABELKIT_").split("__"))
}

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token storage ───────────────────────────────────────────────────

/// Token kept in the system keyring under [`KEYRING_SERVICE`].
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    user: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.into(),
            user: TOKEN_KEY.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, labelkit_api::Error> {
        keyring::Entry::new(&self.service, &self.user).map_err(storage_error)
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

fn storage_error(err: keyring::Error) -> labelkit_api::Error {
    labelkit_api::Error::Storage(format!("keyring: {err}"))
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SecretString>, labelkit_api::Error> {
        match self.entry()?.get_password() {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), labelkit_api::Error> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(storage_error)
    }

    fn clear(&self) -> Result<(), labelkit_api::Error> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

/// Build the token store the config asks for.
pub fn resolve_token_store(cfg: &Config) -> Arc<dyn TokenStore> {
    match cfg.token.storage {
        TokenStorage::Keyring => Arc::new(KeyringTokenStore::new()),
        TokenStorage::File => {
            let dir = cfg.token.dir.clone().unwrap_or_else(data_dir);
            let store = FileTokenStore::in_dir(dir);
            debug!(path = %store.path().display(), "using file token store");
            Arc::new(store)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:8000");
        assert_eq!(cfg.timeout, 10);
        assert_eq!(cfg.token.storage, TokenStorage::File);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://labels.example.com\"\nlocale = \"id\"\n\n[token]\nstorage = \"keyring\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api_url, "https://labels.example.com");
        assert_eq!(cfg.locale, Locale::Id);
        assert_eq!(cfg.token.storage, TokenStorage::Keyring);
        assert_eq!(cfg.timeout, 10);
    }

    #[test]
    fn save_then_load_preserves_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            api_url: "http://10.0.0.2:9000".into(),
            timeout: 3,
            token: TokenConfig {
                storage: TokenStorage::File,
                dir: Some(dir.path().to_path_buf()),
            },
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn session_config_rejects_bad_values() {
        let bad_url = Config {
            api_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            bad_url.session_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "api_url"
        ));

        let zero_timeout = Config {
            timeout: 0,
            ..Config::default()
        };
        assert!(zero_timeout.session_config().is_err());
    }

    #[test]
    fn session_config_carries_settings() {
        let cfg = Config {
            timeout: 4,
            locale: Locale::Id,
            ..Config::default()
        };
        let session = cfg.session_config().unwrap();
        assert_eq!(session.timeout, Duration::from_secs(4));
        assert_eq!(session.locale, Locale::Id);
        assert_eq!(session.base_url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn file_token_store_lives_in_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            token: TokenConfig {
                storage: TokenStorage::File,
                dir: Some(dir.path().to_path_buf()),
            },
            ..Config::default()
        };
        let store = resolve_token_store(&cfg);
        store.save(&SecretString::from("T")).unwrap();
        assert!(dir.path().join(TOKEN_KEY).exists());
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "T");
    }
}
