// ── Session ──
//
// Token lifecycle, profile mirror, and the observer hooks that let
// dependent stores follow the session.

mod listener;
mod store;

pub use listener::SessionListener;
pub use store::{ForcedLogout, SessionState, SessionStore};
