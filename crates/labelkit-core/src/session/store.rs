// ── Session store ──
//
// Owns the token and user profile mirrors, runs the account actions, and
// fans session start/end out to registered listeners. The durable token
// store behind the adapter is the source of truth; `SessionState.token`
// mirrors it for UI binding.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use labelkit_api::{ApiClient, ProfileUpdate, Registration, UnauthorizedHook, UserProfile};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::listener::SessionListener;
use crate::error::CoreError;
use crate::loading::{ActionState, LoadingGuard};
use crate::messages::{Action, Locale};
use crate::navigation::Navigator;

/// Client-visible session fields.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub token: Option<SecretString>,
    pub user: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Display name of the signed-in user, or an empty string.
    pub fn user_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .unwrap_or_default()
    }
}

impl ActionState for SessionState {
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self) {
        self.loading = false;
    }
}

/// Authentication state and account actions.
pub struct SessionStore {
    api: Arc<ApiClient>,
    navigator: Arc<Navigator>,
    locale: Locale,
    state: watch::Sender<SessionState>,
    listeners: RwLock<Vec<Arc<dyn SessionListener>>>,
}

impl SessionStore {
    /// Build the store, seeding the token from durable storage.
    pub fn new(api: Arc<ApiClient>, navigator: Arc<Navigator>, locale: Locale) -> Self {
        let token = api.token().unwrap_or_else(|e| {
            warn!(error = %e, "could not read stored token; starting signed out");
            None
        });
        let (state, _) = watch::channel(SessionState {
            token,
            ..SessionState::default()
        });
        Self {
            api,
            navigator,
            locale,
            state,
            listeners: RwLock::new(Vec::new()),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Register a store to be notified on session start/end.
    pub fn add_listener(&self, listener: Arc<dyn SessionListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    pub fn user_name(&self) -> String {
        self.state.borrow().user_name().to_owned()
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Exchange credentials for a token, load the profile, then let
    /// listeners load their data.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        let _loading = LoadingGuard::begin(&self.state);

        let issued = self
            .api
            .login(email, password)
            .await
            .map_err(|e| self.fail(&e, Action::Login))?;

        self.api
            .authorize(&issued.access_token)
            .map_err(|e| self.fail(&e, Action::Login))?;
        self.state
            .send_modify(|s| s.token = Some(issued.access_token.clone()));

        if let Err(err) = self.load_user().await {
            // `load_user` already tore the session down.
            self.state
                .send_modify(|s| s.error = Some(err.message().to_owned()));
            return Err(err);
        }

        info!(email, "session started");
        for listener in self.listeners() {
            listener.session_started().await;
        }
        Ok(())
    }

    /// Create an account. The session is not touched.
    pub async fn register(&self, registration: &Registration) -> Result<(), CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.api
            .register(registration)
            .await
            .map_err(|e| self.fail(&e, Action::Register))?;
        info!(email = %registration.email, "account registered");
        Ok(())
    }

    /// Ask the server to send a password reset mail.
    pub async fn reset_password(&self, email: &str) -> Result<(), CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.api
            .reset_password(email)
            .await
            .map_err(|e| self.fail(&e, Action::ResetPassword))
    }

    /// Refresh the profile. Without a token this does nothing; a failure
    /// means the token is unusable and the session is ended.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.load_user().await
    }

    /// Body of `current_user` without a loading guard, so `login` can call
    /// it under its own.
    async fn load_user(&self) -> Result<Option<UserProfile>, CoreError> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        match self.api.current_user().await {
            Ok(user) => {
                self.state.send_modify(|s| s.user = Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) => {
                warn!(error = %e, "failed to load current user; logging out");
                let err = CoreError::from_api(&e, &Action::FetchProfile.fallback(self.locale));
                self.logout();
                Err(err)
            }
        }
    }

    /// Send a partial update and merge the returned fields into the
    /// in-memory profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        let changed = self
            .api
            .update_profile(update)
            .await
            .map_err(|e| self.fail(&e, Action::UpdateProfile))?;

        let mut user = self.user().unwrap_or_default();
        if let Err(e) = user.merge(changed) {
            let err = CoreError::Server {
                message: Action::UpdateProfile.fallback(self.locale),
                reason: e.to_string(),
            };
            self.state
                .send_modify(|s| s.error = Some(err.message().to_owned()));
            return Err(err);
        }
        self.state.send_modify(|s| s.user = Some(user.clone()));
        Ok(user)
    }

    /// End the session and return to the login entry point.
    ///
    /// Idempotent: when already signed out only the navigation happens.
    pub fn logout(&self) {
        self.end_session();
        self.navigator.to_login();
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Clear credentials and cached user data, then notify listeners.
    fn end_session(&self) {
        let stored = self.api.token().ok().flatten().is_some();
        let had_session = stored || self.is_authenticated() || self.user().is_some();
        if !had_session {
            debug!("logout with no active session");
            return;
        }

        if let Err(e) = self.api.deauthorize() {
            warn!(error = %e, "failed to remove stored token");
        }
        self.state.send_modify(|s| {
            s.token = None;
            s.user = None;
            s.error = None;
        });
        for listener in self.listeners() {
            listener.session_ended();
        }
        info!("session ended");
    }

    fn listeners(&self) -> Vec<Arc<dyn SessionListener>> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a failure in `error` and hand the converted error back.
    fn fail(&self, err: &labelkit_api::Error, action: Action) -> CoreError {
        let core = CoreError::from_api(err, &action.fallback(self.locale));
        debug!(?action, error = %err, "session action failed");
        self.state
            .send_modify(|s| s.error = Some(core.message().to_owned()));
        core
    }
}

// ── Forced logout ───────────────────────────────────────────────────

/// Adapter hook: a 401 anywhere ends the session and returns to login.
///
/// Holds the session weakly because the session owns the adapter that
/// owns this hook.
pub struct ForcedLogout {
    session: Weak<SessionStore>,
    navigator: Arc<Navigator>,
}

impl ForcedLogout {
    pub fn new(session: Weak<SessionStore>, navigator: Arc<Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl UnauthorizedHook for ForcedLogout {
    fn on_unauthorized(&self) {
        if let Some(session) = self.session.upgrade() {
            session.end_session();
        }
        self.navigator.to_login();
    }
}
