// ── Label store ──
//
// One store per label category. Actions call the adapter and apply the
// confirmed result to `LabelState`; nothing is changed optimistically.

use std::marker::PhantomData;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use labelkit_api::{
    ApiClient, BulkDeleteResult, EntityId, Label, LabelCategory, PreviewImage, PrintableLabel,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use super::state::LabelState;
use crate::error::CoreError;
use crate::loading::LoadingGuard;
use crate::messages::{Action, Locale};
use crate::session::SessionListener;

/// Client-side cache and actions for one label category `C`.
pub struct LabelStore<C: LabelCategory> {
    api: Arc<ApiClient>,
    locale: Locale,
    state: watch::Sender<LabelState>,
    _category: PhantomData<fn() -> C>,
}

impl<C: LabelCategory> LabelStore<C> {
    pub fn new(api: Arc<ApiClient>, locale: Locale) -> Self {
        let (state, _) = watch::channel(LabelState::default());
        Self {
            api,
            locale,
            state,
            _category: PhantomData,
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<LabelState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> LabelState {
        self.state.borrow().clone()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.state.borrow().labels.clone()
    }

    pub fn current_label(&self) -> Option<Label> {
        self.state.borrow().current_label.clone()
    }

    pub fn set_current(&self, label: Option<Label>) {
        self.state.send_modify(|s| s.current_label = label);
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Drop every cached record. Called when the session ends.
    pub fn clear(&self) {
        self.state.send_modify(LabelState::reset);
        debug!(category = C::ROOT, "label cache cleared");
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Create a record and put it at the head of the list.
    pub async fn create(&self, draft: &C::Draft) -> Result<Label, CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        let label = self
            .api
            .create_label::<C>(draft)
            .await
            .map_err(|e| self.fail(&e, Action::CreateLabel(C::KIND)))?;
        info!(category = C::ROOT, id = %label.id, "label created");
        self.state.send_modify(|s| s.apply_created(label.clone()));
        Ok(label)
    }

    /// Replace the cached list with the server's.
    pub async fn fetch_list(&self) -> Result<Vec<Label>, CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        let labels = self
            .api
            .list_labels::<C>()
            .await
            .map_err(|e| self.fail(&e, Action::FetchLabels(C::KIND)))?;
        debug!(category = C::ROOT, count = labels.len(), "labels loaded");
        self.state.send_modify(|s| s.apply_listed(labels.clone()));
        Ok(labels)
    }

    /// Load the print payload for one record. The cache is not touched.
    pub async fn fetch_for_print(&self, id: &EntityId) -> Result<PrintableLabel, CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.api
            .print_label::<C>(id)
            .await
            .map_err(|e| self.fail(&e, Action::FetchForPrint(C::KIND)))
    }

    /// Token-bearing preview URL for one record.
    pub fn preview_url(&self, id: &EntityId) -> Result<Url, CoreError> {
        self.api
            .preview_url::<C>(id)
            .map_err(|e| self.fail(&e, Action::FetchPreview(C::KIND)))
    }

    /// Download the preview image for one record.
    pub async fn fetch_preview(&self, id: &EntityId) -> Result<PreviewImage, CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.api
            .fetch_preview::<C>(id)
            .await
            .map_err(|e| self.fail(&e, Action::FetchPreview(C::KIND)))
    }

    /// Delete one record, then drop it from the cache.
    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.api
            .delete_label::<C>(id)
            .await
            .map_err(|e| self.fail(&e, Action::DeleteLabel(C::KIND)))?;
        info!(category = C::ROOT, %id, "label deleted");
        self.state
            .send_modify(|s| s.apply_removed(std::slice::from_ref(id)));
        Ok(())
    }

    /// Delete several records in one request, then drop all of them from
    /// the cache.
    pub async fn bulk_delete(&self, ids: &[EntityId]) -> Result<BulkDeleteResult, CoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        let result = self
            .api
            .bulk_delete_labels::<C>(ids)
            .await
            .map_err(|e| self.fail(&e, Action::BulkDelete(C::KIND)))?;
        if !result.failed_ids.is_empty() {
            warn!(
                category = C::ROOT,
                failed = result.failed_ids.len(),
                "server reported partial bulk delete"
            );
        }
        info!(category = C::ROOT, requested = ids.len(), "labels bulk deleted");
        self.state.send_modify(|s| s.apply_removed(ids));
        Ok(result)
    }

    fn fail(&self, err: &labelkit_api::Error, action: Action) -> CoreError {
        let core = CoreError::from_api(err, &action.fallback(self.locale));
        debug!(?action, error = %err, "label action failed");
        self.state
            .send_modify(|s| s.error = Some(core.message().to_owned()));
        core
    }
}

impl<C: LabelCategory> SessionListener for LabelStore<C> {
    fn session_started(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Err(e) = self.fetch_list().await {
                warn!(category = C::ROOT, error = %e, "initial label load failed");
            }
        })
    }

    fn session_ended(&self) {
        self.clear();
    }
}
