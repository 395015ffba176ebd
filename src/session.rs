//! Favorites session
//!
//! Wires one execution context together:
//! 1. read the favorites slot and hydrate the store before anything reads it
//! 2. persist local changes through the debounced writer
//! 3. hydrate from other contexts' writes via [`CrossTabSync`]
//!
//! The session owns both background tasks. [`FavoritesSession::shutdown`]
//! flushes a pending write and stops them; dropping the session stops
//! them without flushing.

use crate::persistence::{DebouncedWriter, FavoritesPersistence, DEFAULT_DEBOUNCE};
use crate::storage::TabStorage;
use crate::store::{ChangeSource, FavoritesStore, Published};
use crate::sync::CrossTabSync;
use camper_catalog_common::snapshot::{ids_equal, is_equal};
use camper_catalog_common::{FavoritesAction, FavoritesState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Quiet period before local changes are written
    pub debounce: Duration,
    /// Follow other contexts' writes
    pub cross_tab: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            cross_tab: true,
        }
    }
}

pub struct FavoritesSession {
    store: FavoritesStore,
    persistence: Arc<FavoritesPersistence<TabStorage>>,
    effects: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
    sync: Option<CrossTabSync>,
}

impl FavoritesSession {
    /// Hydrate from storage and start the background tasks.
    /// Must be called inside a Tokio runtime.
    pub fn boot(storage: TabStorage, options: SessionOptions) -> Self {
        // Subscribe before reading so no write lands in between unseen
        let events = options.cross_tab.then(|| storage.subscribe());

        let persistence = Arc::new(FavoritesPersistence::new(storage));
        let store = FavoritesStore::new();

        let stored = persistence.read();
        info!(
            context = persistence.storage().context(),
            restored = stored.as_ref().map_or(0, |s| s.ids.len()),
            "favorites session starting"
        );
        store.hydrate_from_storage(stored.unwrap_or_else(|| FavoritesState::with_ids(Vec::<String>::new())));

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let writer = DebouncedWriter::new(Arc::clone(&persistence), options.debounce);
        // Baseline taken now, so dispatches made before the task first runs
        // still count as local changes
        let effects = tokio::spawn(run_effects(
            Effects {
                store: store.clone(),
                persistence: Arc::clone(&persistence),
                writer,
                persisted: store.ids(),
            },
            store.subscribe(),
            shutdown_rx,
        ));

        let sync = events.map(|events| CrossTabSync::spawn(store.clone(), events, Arc::clone(&persistence)));

        Self {
            store,
            persistence,
            effects: Some(effects),
            shutdown: Some(shutdown_tx),
            sync,
        }
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    pub fn dispatch(&self, action: FavoritesAction) -> bool {
        self.store.dispatch(action)
    }

    pub fn toggle(&self, id: impl Into<String>) -> bool {
        self.dispatch(FavoritesAction::Toggle(id.into()))
    }

    pub fn add(&self, id: impl Into<String>) -> bool {
        self.dispatch(FavoritesAction::Add(id.into()))
    }

    pub fn remove(&self, id: impl Into<String>) -> bool {
        self.dispatch(FavoritesAction::Remove(id.into()))
    }

    pub fn clear(&self) -> bool {
        self.dispatch(FavoritesAction::Clear)
    }

    /// What the slot currently holds (possibly another context's write)
    pub fn stored(&self) -> Option<FavoritesState> {
        self.persistence.read()
    }

    /// Flush a pending write and stop the background tasks
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(effects) = self.effects.take() {
            let _ = effects.await;
        }
        if let Some(sync) = self.sync.take() {
            sync.stop().await;
        }
        debug!("favorites session stopped");
    }
}

impl Drop for FavoritesSession {
    fn drop(&mut self) {
        if let Some(effects) = self.effects.take() {
            effects.abort();
        }
        // CrossTabSync aborts itself on drop
    }
}

/// State of the persistence effect
struct Effects {
    store: FavoritesStore,
    persistence: Arc<FavoritesPersistence<TabStorage>>,
    writer: DebouncedWriter<TabStorage>,
    /// Ids last handed to the writer or adopted from storage
    persisted: Vec<String>,
}

/// Persist local changes until shutdown
///
/// Changes that came from storage are recorded as already persisted, so a
/// hydrate never echoes back into the slot.
async fn run_effects(
    mut effects: Effects,
    mut changes: watch::Receiver<Published>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let published = changes.borrow_and_update().clone();
                effects.observe(published);
            }
            _ = &mut shutdown => {
                if changes.has_changed().unwrap_or(false) {
                    let published = changes.borrow_and_update().clone();
                    effects.observe(published);
                }
                break;
            }
        }
    }

    effects.writer.flush();
}

impl Effects {
    fn observe(&mut self, published: Published) {
        match published.source {
            ChangeSource::Storage | ChangeSource::Initial => {
                // The slot already holds a newer state; an older local
                // write must not land on top of it
                self.writer.cancel();
                self.persisted = published.state.ids.clone();
                self.settle_on_slot(&published.state);
            }
            ChangeSource::Local => {
                if !ids_equal(&self.persisted, &published.state.ids) {
                    self.persisted = published.state.ids.clone();
                    self.writer.schedule(published.state);
                }
            }
        }
    }

    /// Re-read the slot after a hydrate
    ///
    /// This context's own write may have landed between the notification
    /// and the hydrate. No notification reports it back here, so the slot
    /// is checked directly and the store follows it.
    fn settle_on_slot(&mut self, hydrated: &FavoritesState) {
        // A newer change is queued and will be observed on its own
        if !is_equal(&self.store.snapshot(), hydrated) {
            return;
        }
        let Some(stored) = self.persistence.read() else {
            return;
        };
        if !is_equal(&stored, hydrated) {
            debug!(count = stored.ids.len(), "slot moved on during hydrate");
            self.persisted = stored.ids.clone();
            self.store.hydrate_from_storage(stored);
        }
    }
}
