//! Client session and data-sync layer between `labelkit-api` and UI
//! consumers.
//!
//! - **[`SessionContext`]** builds the object graph: one [`ApiClient`]
//!   shared by every store, a [`SessionStore`], a [`LabelStore`] per label
//!   category, and the [`Navigator`]. A 401 from any request ends the
//!   session and moves the navigator to [`Route::Login`].
//!
//! - **[`SessionStore`]** holds the token and profile mirrors and runs the
//!   account actions (login, register, password reset, profile update,
//!   logout). Stores that cache per-user data implement
//!   [`SessionListener`] and are cleared when the session ends.
//!
//! - **[`LabelStore<C>`]** caches the records of one category, newest
//!   first. Mutations are applied only after the server confirmed them.
//!
//! - **[`NavigationGuard`]** decides which views need a session.
//!
//! All state is published through `tokio::sync::watch` channels: call
//! `subscribe()` on any store to follow its changes, or `snapshot()` for
//! a one-off read.
//!
//! [`ApiClient`]: labelkit_api::ApiClient

pub mod config;
pub mod context;
pub mod error;
pub mod label;
mod loading;
pub mod messages;
pub mod navigation;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SessionConfig;
pub use context::SessionContext;
pub use error::CoreError;
pub use label::{LabelState, LabelStore};
pub use messages::{Action, Locale};
pub use navigation::{Decision, NavigationGuard, Navigator, Route};
pub use session::{ForcedLogout, SessionListener, SessionState, SessionStore};

// Adapter types consumers need alongside the stores.
pub use labelkit_api::{
    BulkDeleteResult, EntityId, FailedDelete, Generic, Label, LabelCategory, LabelKind,
    NewLabel, NewShippingLabel, PreviewImage, PrintableLabel, ProfileUpdate, Registration,
    Shipping, TokenStore, UserProfile,
};
