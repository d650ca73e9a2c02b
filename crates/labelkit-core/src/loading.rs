// Scoped loading flag.
//
// An action holds a `LoadingGuard` for its whole duration. Creating the
// guard sets `loading` and clears the previous error; dropping it clears
// `loading` on every exit path, including early returns via `?`.

use tokio::sync::watch;

/// State that exposes a loading flag and a last-error slot.
pub(crate) trait ActionState {
    fn begin(&mut self);
    fn finish(&mut self);
}

pub(crate) struct LoadingGuard<'a, S: ActionState> {
    state: &'a watch::Sender<S>,
}

impl<'a, S: ActionState> LoadingGuard<'a, S> {
    pub(crate) fn begin(state: &'a watch::Sender<S>) -> Self {
        state.send_modify(ActionState::begin);
        Self { state }
    }
}

impl<S: ActionState> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.state.send_modify(ActionState::finish);
    }
}
