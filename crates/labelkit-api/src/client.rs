// HTTP client adapter
//
// Wraps `reqwest::Client` with bearer-token injection from the durable
// token store, `detail` extraction from error bodies, and the global
// 401 policy: clear the stored token, notify the unauthorized hook,
// surface the error. Endpoint families live in `auth.rs` and `labels.rs`
// as inherent methods.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::token::TokenStore;
use crate::transport::TransportConfig;

/// Called by the adapter after it has cleared the token in response to a
/// `401 Unauthorized`.
///
/// The session layer implements this to force navigation back to the
/// login entry point.
pub trait UnauthorizedHook: Send + Sync {
    fn on_unauthorized(&self);
}

/// Error body shape used by the service: `{"detail": "..."}` or, for
/// request validation failures, `{"detail": [{"msg": "..."}, ...]}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Async client for the label service.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
    tokens: Arc<dyn TokenStore>,
    unauthorized: Option<Arc<dyn UnauthorizedHook>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from transport settings and the token store it
    /// reads credentials from.
    pub fn new(transport: &TransportConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            transport.base_url.clone(),
            transport.timeout.as_secs(),
            tokens,
        ))
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        timeout_secs: u64,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            timeout_secs,
            tokens,
            unauthorized: None,
        }
    }

    /// Register the hook run after every 401.
    pub fn with_unauthorized_hook(mut self, hook: Arc<dyn UnauthorizedHook>) -> Self {
        self.unauthorized = Some(hook);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    // ── Credentials ──────────────────────────────────────────────────

    /// The token currently in durable storage.
    pub fn token(&self) -> Result<Option<SecretString>, Error> {
        self.tokens.load()
    }

    /// Persist `token`; every later request carries it.
    pub fn authorize(&self, token: &SecretString) -> Result<(), Error> {
        self.tokens.save(token)
    }

    /// Drop the stored token; later requests go out without credentials.
    pub fn deauthorize(&self) -> Result<(), Error> {
        self.tokens.clear()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"labels/print/3"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request pipeline ─────────────────────────────────────────────

    /// Start a request with the bearer header applied when a token exists.
    pub(crate) fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, Error> {
        debug!("{method} {url}");
        let builder = self.http.request(method, url);
        Ok(match self.tokens.load()? {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Send a request, converting transport failures and error statuses.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, Error> {
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        trace!(%status, "response received");

        if status == StatusCode::UNAUTHORIZED {
            let detail = read_detail(resp).await;
            self.handle_unauthorized();
            return Err(Error::Unauthorized { detail });
        }

        if !status.is_success() {
            let detail = read_detail(resp).await;
            return Err(Error::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(resp)
    }

    /// Send and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, Error> {
        let resp = self.send(builder).await?;
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        decode(&body)
    }

    /// Send and discard whatever body comes back.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), Error> {
        self.send(builder).await.map(drop)
    }

    pub(crate) fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    fn handle_unauthorized(&self) {
        warn!("server rejected credentials; clearing stored token");
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "failed to clear token after 401");
        }
        if let Some(hook) = &self.unauthorized {
            hook.on_unauthorized();
        }
    }
}

/// Ensure the base path ends with `/` so relative joins append.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Decode a JSON body. The error keeps a preview of at most 200 chars.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Pull a human-readable message out of an error response body.
async fn read_detail(resp: Response) -> Option<String> {
    let body = resp.text().await.ok()?;
    parse_detail(&body)
}

pub(crate) fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .map(str::to_owned)
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
