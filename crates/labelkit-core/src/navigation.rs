// ── Navigation ──
//
// Route table, the guard that gates authenticated views, and the
// navigator that holds the current route. The navigator is also the
// adapter's unauthorized hook target: a 401 anywhere lands on `Login`.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tokio::sync::watch;
use tracing::debug;

/// Every view the application can show.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum Route {
    #[strum(serialize = "/")]
    Root,
    #[strum(serialize = "/login")]
    Login,
    #[strum(serialize = "/register")]
    Register,
    #[strum(serialize = "/reset-password")]
    ResetPassword,
    #[strum(serialize = "/dashboard")]
    Dashboard,
    #[strum(serialize = "/create-label")]
    CreateLabel,
    #[strum(serialize = "/create-shipping-label")]
    CreateShippingLabel,
    #[strum(serialize = "/profile/edit")]
    ProfileEdit,
}

impl Route {
    pub fn path(self) -> &'static str {
        self.into()
    }

    /// Look a route up by path. Unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::from_str(path).ok()
    }

    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::CreateLabel | Self::CreateShippingLabel | Self::ProfileEdit
        )
    }

    /// Views an authenticated user is bounced away from.
    fn is_guest_only(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Redirect(Route),
}

/// Gates views on authentication state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationGuard;

impl NavigationGuard {
    /// Decide what happens when navigating to `to`.
    pub fn check(self, to: Route, authenticated: bool) -> Decision {
        if to == Route::Root {
            Decision::Redirect(Route::Dashboard)
        } else if to.requires_auth() && !authenticated {
            Decision::Redirect(Route::Login)
        } else if to.is_guest_only() && authenticated {
            Decision::Redirect(Route::Dashboard)
        } else {
            Decision::Proceed
        }
    }

    /// Follow redirects until a route is allowed.
    pub fn resolve(self, mut to: Route, authenticated: bool) -> Route {
        // Redirect chains are at most two hops (Root -> Dashboard -> Login).
        for _ in 0..4 {
            match self.check(to, authenticated) {
                Decision::Proceed => return to,
                Decision::Redirect(next) => to = next,
            }
        }
        to
    }
}

/// Holds the current route and applies the guard on every change.
pub struct Navigator {
    guard: NavigationGuard,
    current: watch::Sender<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial);
        Self {
            guard: NavigationGuard,
            current,
        }
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    /// Navigate to `to`, landing wherever the guard sends us.
    pub fn navigate(&self, to: Route, authenticated: bool) -> Route {
        let landed = self.guard.resolve(to, authenticated);
        if landed != to {
            debug!(requested = %to, landed = %landed, "navigation redirected");
        }
        self.current.send_replace(landed);
        landed
    }

    /// Unconditional move to the login entry point.
    pub fn to_login(&self) {
        self.current.send_replace(Route::Login);
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}
