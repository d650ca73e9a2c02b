// ── Label list state ──
//
// A client-side cache of one category's records, newest first. Every
// mutation here is applied only after the server confirmed it.

use std::collections::HashSet;

use labelkit_api::{EntityId, Label};

use crate::loading::ActionState;

/// Client-visible fields of a label store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelState {
    /// Records, most recently created first.
    pub labels: Vec<Label>,
    /// Copy of the most recently created or selected record.
    pub current_label: Option<Label>,
    pub loading: bool,
    pub error: Option<String>,
}

impl LabelState {
    /// Prepend a freshly created record and make it current.
    pub(crate) fn apply_created(&mut self, label: Label) {
        self.current_label = Some(label.clone());
        self.labels.insert(0, label);
    }

    /// Replace the whole list with the server's collection.
    pub(crate) fn apply_listed(&mut self, labels: Vec<Label>) {
        self.labels = labels;
    }

    /// Drop every record whose id is in `ids`; clear the current label if
    /// it was one of them.
    pub(crate) fn apply_removed(&mut self, ids: &[EntityId]) {
        let ids: HashSet<&EntityId> = ids.iter().collect();
        self.labels.retain(|l| !ids.contains(&l.id));
        if self
            .current_label
            .as_ref()
            .is_some_and(|current| ids.contains(&current.id))
        {
            self.current_label = None;
        }
    }

    /// Forget everything (session ended).
    pub(crate) fn reset(&mut self) {
        self.labels.clear();
        self.current_label = None;
        self.error = None;
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.labels.iter().map(|l| l.id.clone()).collect()
    }
}

impl ActionState for LabelState {
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self) {
        self.loading = false;
    }
}
