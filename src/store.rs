//! Favorites store
//!
//! Holds the current [`FavoritesState`] and publishes every change to
//! subscribers. Transitions are the pure reducer from the common crate;
//! the store only decides whether anything changed and who caused it.

use camper_catalog_common::{FavoritesAction, FavoritesState};
use std::sync::Arc;
use tokio::sync::watch;

/// Who produced the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// Initial state, nothing dispatched yet
    Initial,
    /// A dispatch from this context
    Local,
    /// Hydration from storage (boot read or another context's write)
    Storage,
}

/// State as seen by subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub state: FavoritesState,
    pub source: ChangeSource,
}

/// Shared handle on the favorites state
#[derive(Clone)]
pub struct FavoritesStore {
    tx: Arc<watch::Sender<Published>>,
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Published {
            state: FavoritesState::default(),
            source: ChangeSource::Initial,
        });
        Self { tx: Arc::new(tx) }
    }

    /// Apply a local action. Returns whether the state changed;
    /// subscribers are only notified when it did.
    pub fn dispatch(&self, action: FavoritesAction) -> bool {
        self.apply(action, ChangeSource::Local)
    }

    /// Hydrate from a snapshot read out of storage
    pub fn hydrate_from_storage(&self, snapshot: FavoritesState) -> bool {
        self.apply(FavoritesAction::Hydrate(snapshot), ChangeSource::Storage)
    }

    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.tx.subscribe()
    }

    fn apply(&self, action: FavoritesAction, source: ChangeSource) -> bool {
        self.tx.send_if_modified(|current| {
            let next = current.state.clone().reduce(action);
            if next == current.state {
                return false;
            }
            *current = Published { state: next, source };
            true
        })
    }

    // Selectors

    pub fn snapshot(&self) -> FavoritesState {
        self.tx.borrow().state.clone()
    }

    pub fn ids(&self) -> Vec<String> {
        self.tx.borrow().state.ids.clone()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.tx.borrow().state.is_favorite(id)
    }

    pub fn count(&self) -> usize {
        self.tx.borrow().state.count()
    }

    pub fn is_hydrated(&self) -> bool {
        self.tx.borrow().state.is_hydrated()
    }
}
