// ── Labels ──
//
// Per-category record caches. `LabelStore<Generic>` and
// `LabelStore<Shipping>` share the same code and differ only in endpoint
// root and creation payload.

mod state;
mod store;

pub use state::LabelState;
pub use store::LabelStore;
