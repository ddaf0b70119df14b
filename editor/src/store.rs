use std::sync::Arc;

use jems_shared::MapDocument;
use tokio::sync::watch;
use tracing::debug;

use crate::action::EditAction;
use crate::config::default_hue;
use crate::reducer::edit_reducer;
use crate::state::EditPageState;

/// Owns the edit page state and publishes every new revision.
///
/// Readers either take a snapshot with [`EditStore::state`] or follow
/// revisions through [`EditStore::subscribe`]. Old snapshots stay valid
/// after a dispatch replaces them.
pub struct EditStore {
    tx: watch::Sender<Arc<EditPageState>>,
}

impl EditStore {
    /// Store holding the placeholder document until a real one loads.
    pub fn new() -> Self {
        Self::with_state(EditPageState::new(MapDocument::error_with_hue(
            &default_hue(),
        )))
    }

    pub fn with_state(state: EditPageState) -> Self {
        let (tx, _) = watch::channel(Arc::new(state));
        Self { tx }
    }

    /// Run `action` through the reducer. Subscribers are only notified
    /// when the action produced a new state.
    pub fn dispatch(&self, action: EditAction) {
        let kind = action.kind();
        let changed = self.tx.send_if_modified(|current| {
            let next = edit_reducer(Arc::clone(current), action);
            if Arc::ptr_eq(&next, current) {
                return false;
            }
            *current = next;
            true
        });
        debug!(action = kind, changed, "dispatched edit action");
    }

    /// Install a document handed over by the loader.
    pub fn load(&self, map: MapDocument) {
        self.dispatch(EditAction::InitMap { map: Some(map) });
    }

    pub fn state(&self) -> Arc<EditPageState> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<EditPageState>> {
        self.tx.subscribe()
    }
}

impl Default for EditStore {
    fn default() -> Self {
        Self::new()
    }
}
