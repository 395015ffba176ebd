//! Favorites persistence
//!
//! Reads and writes the favorites record in its storage slot. Persistence
//! is best-effort: every failure is logged and swallowed, so a full or
//! disabled store only means "no persistence this session".

mod debounce;

pub use debounce::{DebouncedWriter, DEFAULT_DEBOUNCE};

use crate::storage::KeyValueStorage;
use camper_catalog_common::snapshot::{self, FAVORITES_STORAGE_KEY};
use camper_catalog_common::FavoritesState;
use tracing::{debug, warn};

/// Favorites slot on top of a storage backend
pub struct FavoritesPersistence<S> {
    storage: S,
}

impl<S: KeyValueStorage> FavoritesPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stored favorites, or `None` when absent, unreadable or invalid
    pub fn read(&self) -> Option<FavoritesState> {
        let text = match self.storage.get_item(FAVORITES_STORAGE_KEY) {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "favorites storage unreadable");
                return None;
            }
        };

        let state = snapshot::deserialize(&text);
        if state.is_none() {
            warn!(key = FAVORITES_STORAGE_KEY, "ignoring malformed favorites record");
        }
        state
    }

    /// Store `state`; failures are logged, never returned
    pub fn write(&self, state: &FavoritesState) {
        let text = snapshot::serialize(state);
        match self.storage.set_item(FAVORITES_STORAGE_KEY, &text) {
            Ok(()) => debug!(count = state.ids.len(), "favorites written"),
            Err(e) => warn!(error = %e, "favorites not persisted"),
        }
    }
}
