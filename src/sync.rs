//! Cross-tab synchronization
//!
//! Another context writing the favorites slot means this context's store
//! is stale. The synchronizer listens to the storage notifications and
//! hydrates the store with the other context's snapshot. It is purely
//! reactive: there is no polling.
//!
//! Notifications arrive after the fact. When two contexts write at nearly
//! the same time, the slot keeps only the last write, so a notification may
//! describe a value that has already been overwritten. The store is always
//! hydrated with what the slot holds now, which makes every context settle
//! on the same last write.

use crate::persistence::FavoritesPersistence;
use crate::storage::{KeyValueStorage, StorageEvent, StorageEvents};
use crate::store::FavoritesStore;
use camper_catalog_common::snapshot::{self, FAVORITES_STORAGE_KEY};
use camper_catalog_common::FavoritesState;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Snapshot to hydrate with, if `event` should change `current`
///
/// Ignored: other keys, removals and empty values, payloads that fail to
/// decode, and snapshots whose ids equal the current ones in any order.
pub fn reconcile(current: &FavoritesState, event: &StorageEvent) -> Option<FavoritesState> {
    if event.key != FAVORITES_STORAGE_KEY {
        return None;
    }
    let text = event.new_value.as_deref().filter(|v| !v.is_empty())?;

    let Some(incoming) = snapshot::deserialize(text) else {
        debug!(origin = event.origin, "ignoring malformed favorites notification");
        return None;
    };

    (!snapshot::is_equal(current, &incoming)).then_some(incoming)
}

/// Replace a superseded notification with what the slot holds now
///
/// An absent or unreadable slot leaves `incoming` as is.
pub fn latest(incoming: FavoritesState, stored: Option<FavoritesState>) -> FavoritesState {
    match stored {
        Some(stored) if !snapshot::is_equal(&stored, &incoming) => {
            debug!(count = stored.ids.len(), "favorites notification superseded");
            stored
        }
        _ => incoming,
    }
}

/// Running synchronizer; dropping it stops the listener
pub struct CrossTabSync {
    task: JoinHandle<()>,
}

impl CrossTabSync {
    /// Start listening. Must be called inside a Tokio runtime.
    pub fn spawn<S: KeyValueStorage + 'static>(
        store: FavoritesStore,
        mut events: StorageEvents,
        persistence: Arc<FavoritesPersistence<S>>,
    ) -> Self {
        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let Some(incoming) = reconcile(&store.snapshot(), &event) else {
                    continue;
                };
                let incoming = latest(incoming, persistence.read());
                if snapshot::is_equal(&store.snapshot(), &incoming) {
                    continue;
                }
                info!(
                    origin = event.origin,
                    count = incoming.ids.len(),
                    "favorites changed in another context"
                );
                store.hydrate_from_storage(incoming);
            }
            debug!("storage notifications closed");
        });
        Self { task }
    }

    /// Stop listening and wait for the task to wind down
    pub async fn stop(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }
}

impl Drop for CrossTabSync {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(key: &str, value: Option<&str>) -> StorageEvent {
        StorageEvent {
            key: key.to_string(),
            new_value: value.map(str::to_string),
            origin: 7,
        }
    }

    fn record(ids: &[&str]) -> String {
        snapshot::serialize(&FavoritesState::with_ids(ids.iter().copied()))
    }

    #[test]
    fn test_new_snapshot_is_applied() {
        let current = FavoritesState::with_ids(["a"]);
        let text = record(&["a", "b"]);
        let incoming = reconcile(&current, &event(FAVORITES_STORAGE_KEY, Some(&text)));
        assert_eq!(incoming, Some(FavoritesState::with_ids(["a", "b"])));
    }

    #[test]
    fn test_equal_snapshot_is_ignored() {
        let current = FavoritesState::with_ids(["a", "b"]);
        let text = record(&["b", "a"]);
        assert_eq!(reconcile(&current, &event(FAVORITES_STORAGE_KEY, Some(&text))), None);
    }

    #[test]
    fn test_other_keys_and_removals_are_ignored() {
        let current = FavoritesState::default();
        let text = record(&["a"]);
        assert_eq!(reconcile(&current, &event("other", Some(&text))), None);
        assert_eq!(reconcile(&current, &event(FAVORITES_STORAGE_KEY, None)), None);
        assert_eq!(reconcile(&current, &event(FAVORITES_STORAGE_KEY, Some(""))), None);
    }

    #[test]
    fn test_malformed_payload_is_ignored() {
        let current = FavoritesState::with_ids(["a"]);
        for bad in ["{", r#"{"ids":["b"]}"#, r#"{"ids":["b"],"hydrated":true,"version":9}"#] {
            assert_eq!(reconcile(&current, &event(FAVORITES_STORAGE_KEY, Some(bad))), None);
        }
    }

    #[test]
    fn test_latest_prefers_the_slot() {
        let incoming = FavoritesState::with_ids(["x"]);
        let stored = FavoritesState::with_ids(["y"]);
        assert_eq!(latest(incoming.clone(), Some(stored.clone())), stored);
        assert_eq!(latest(incoming.clone(), None), incoming);
        assert_eq!(latest(incoming.clone(), Some(FavoritesState::with_ids(["x"]))), incoming);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwritten_notification_is_not_applied() {
        use crate::storage::{MemoryStorage, SharedStorage};
        use std::time::Duration;

        let shared = SharedStorage::new(MemoryStorage::new());
        let own = shared.connect();
        let other = shared.connect();

        let store = FavoritesStore::new();
        store.hydrate_from_storage(FavoritesState::with_ids(["mine"]));
        let sync = CrossTabSync::spawn(
            store.clone(),
            own.subscribe(),
            Arc::new(FavoritesPersistence::new(own.clone())),
        );
        let mut rx = store.subscribe();

        // The other context writes first, then this context overwrites it
        // before the notification is handled
        other.set_item(FAVORITES_STORAGE_KEY, &record(&["theirs"])).unwrap();
        own.set_item(FAVORITES_STORAGE_KEY, &record(&["mine"])).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.ids(), vec!["mine"]);
        assert!(!rx.has_changed().unwrap());
        sync.stop().await;
    }
}
