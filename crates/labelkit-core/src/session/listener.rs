// Session lifecycle notifications.
//
// Stores holding per-user data register with the session store instead of
// the session reaching into them. `session_started` lets them load fresh
// data; `session_ended` must leave them holding nothing authenticated.

use futures_util::future::BoxFuture;

/// Observer of session start/end.
pub trait SessionListener: Send + Sync {
    /// A login completed and the profile is loaded.
    fn session_started(&self) -> BoxFuture<'_, ()>;

    /// The session ended (logout, failed profile fetch, or forced logout
    /// after a 401). Must run synchronously.
    fn session_ended(&self);
}
