// ── Session context ──
//
// Wires the adapter, the session store, both label stores, and the
// navigator into one object graph. The adapter's 401 hook needs the
// session store, which owns the adapter, so the session is built with
// `Arc::new_cyclic` and the hook holds it weakly.

use std::sync::Arc;

use labelkit_api::{ApiClient, Generic, Shipping, TokenStore};
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::label::LabelStore;
use crate::navigation::{Navigator, Route};
use crate::session::{ForcedLogout, SessionListener, SessionStore};

/// The full client-side state of one user session.
pub struct SessionContext {
    session: Arc<SessionStore>,
    labels: Arc<LabelStore<Generic>>,
    shipping: Arc<LabelStore<Shipping>>,
    navigator: Arc<Navigator>,
}

impl SessionContext {
    /// Build the graph. `tokens` is the durable token store; a token
    /// already in it makes the context start authenticated.
    pub fn new(config: &SessionConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let transport = config.transport();
        let http = transport
            .build_client()
            .map_err(|e| CoreError::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?;
        let navigator = Arc::new(Navigator::default());

        let session = Arc::new_cyclic(|weak| {
            let hook = Arc::new(ForcedLogout::new(weak.clone(), Arc::clone(&navigator)));
            let api = ApiClient::with_client(
                http,
                transport.base_url.clone(),
                transport.timeout.as_secs(),
                tokens,
            )
            .with_unauthorized_hook(hook);
            SessionStore::new(Arc::new(api), Arc::clone(&navigator), config.locale)
        });

        let api = Arc::clone(session.api());
        let labels = Arc::new(LabelStore::<Generic>::new(Arc::clone(&api), config.locale));
        let shipping = Arc::new(LabelStore::<Shipping>::new(api, config.locale));
        session.add_listener(Arc::clone(&labels) as Arc<dyn SessionListener>);
        session.add_listener(Arc::clone(&shipping) as Arc<dyn SessionListener>);

        debug!(
            base_url = %config.base_url,
            authenticated = session.is_authenticated(),
            "session context ready"
        );
        Ok(Self {
            session,
            labels,
            shipping,
            navigator,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn labels(&self) -> &Arc<LabelStore<Generic>> {
        &self.labels
    }

    pub fn shipping(&self) -> &Arc<LabelStore<Shipping>> {
        &self.shipping
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// Navigate to `to` through the guard, using the current session.
    pub fn navigate(&self, to: Route) -> Route {
        self.navigator.navigate(to, self.session.is_authenticated())
    }

    /// Tear the session down: durable token, profile, and every label
    /// cache are cleared and the navigator returns to `Login`.
    pub fn shutdown(&self) {
        self.session.logout();
    }
}
