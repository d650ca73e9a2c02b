// labelkit-api: Async Rust client for the label-printing REST API

mod auth;
pub mod client;
pub mod error;
pub mod labels;
pub mod models;
pub mod token;
pub mod transport;

pub use client::{ApiClient, UnauthorizedHook};
pub use error::{Error, ErrorKind};
pub use labels::{Generic, LabelCategory, LabelKind, Shipping};
pub use models::{
    BulkDeleteResult, EntityId, FailedDelete, Label, NewLabel, NewShippingLabel, PreviewImage,
    PrintableLabel, ProfileUpdate, Registration, TokenResponse, UserProfile,
};
pub use token::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
pub use transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TransportConfig};
