use super::KeyValueStorage;
use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

const EVENT_CAPACITY: usize = 64;

/// Identifies one execution context (tab) attached to a [`SharedStorage`]
pub type ContextId = u64;

/// A change made to a shared slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed
    pub new_value: Option<String>,
    pub origin: ContextId,
}

/// Storage shared by several execution contexts
///
/// Each context attaches with [`SharedStorage::connect`]. Writes made
/// through one context's handle are announced to every other context,
/// never to the writer itself.
#[derive(Clone)]
pub struct SharedStorage {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Box<dyn KeyValueStorage>,
    events: broadcast::Sender<StorageEvent>,
    next_context: AtomicU64,
}

impl SharedStorage {
    pub fn new(backend: impl KeyValueStorage + 'static) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                backend: Box::new(backend),
                events,
                next_context: AtomicU64::new(1),
            }),
        }
    }

    /// Attach a new execution context
    pub fn connect(&self) -> TabStorage {
        let context = self.inner.next_context.fetch_add(1, Ordering::Relaxed);
        debug!(context, "storage context connected");
        TabStorage {
            shared: self.clone(),
            context,
        }
    }

    fn announce(&self, event: StorageEvent) {
        // No subscribers is not an error
        let _ = self.inner.events.send(event);
    }
}

/// One context's handle on a [`SharedStorage`]
#[derive(Clone)]
pub struct TabStorage {
    shared: SharedStorage,
    context: ContextId,
}

impl TabStorage {
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Changes made by the other contexts, from now on
    pub fn subscribe(&self) -> StorageEvents {
        StorageEvents {
            receiver: self.shared.inner.events.subscribe(),
            context: self.context,
        }
    }
}

impl KeyValueStorage for TabStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.shared.inner.backend.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.shared.inner.backend.set_item(key, value)?;
        self.shared.announce(StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
            origin: self.context,
        });
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.shared.inner.backend.remove_item(key)?;
        self.shared.announce(StorageEvent {
            key: key.to_string(),
            new_value: None,
            origin: self.context,
        });
        Ok(())
    }
}

/// Notification stream for one context
pub struct StorageEvents {
    receiver: broadcast::Receiver<StorageEvent>,
    context: ContextId,
}

impl StorageEvents {
    /// Next change made by another context
    ///
    /// Returns `None` once the shared storage is gone. If this receiver
    /// fell behind, the missed events are skipped.
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.context => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(context = self.context, skipped, "storage notifications dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_other_contexts_are_notified() {
        let shared = SharedStorage::new(MemoryStorage::new());
        let tab_a = shared.connect();
        let tab_b = shared.connect();
        assert_ne!(tab_a.context(), tab_b.context());

        let mut events_b = tab_b.subscribe();
        tab_a.set_item("k", "v").unwrap();

        let event = events_b.recv().await.expect("event for tab b");
        assert_eq!(event.key, "k");
        assert_eq!(event.new_value.as_deref(), Some("v"));
        assert_eq!(event.origin, tab_a.context());

        // Both tabs see the same backend
        assert_eq!(tab_b.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_own_writes_are_not_delivered() {
        let shared = SharedStorage::new(MemoryStorage::new());
        let tab_a = shared.connect();
        let tab_b = shared.connect();
        let mut events_a = tab_a.subscribe();

        tab_a.set_item("k", "mine").unwrap();
        tab_b.remove_item("k").unwrap();

        let event = events_a.recv().await.expect("event from tab b");
        assert_eq!(event.origin, tab_b.context());
        assert_eq!(event.new_value, None);
    }

    #[tokio::test]
    async fn test_failed_write_is_not_announced() {
        let backend = Arc::new(MemoryStorage::new());
        let shared = SharedStorage::new(Arc::clone(&backend));
        let tab_a = shared.connect();
        let tab_b = shared.connect();
        let mut events_b = tab_b.subscribe();

        backend.set_unavailable(true);
        assert!(tab_a.set_item("k", "lost").is_err());
        backend.set_unavailable(false);
        tab_a.set_item("k", "kept").unwrap();

        let event = events_b.recv().await.unwrap();
        assert_eq!(event.new_value.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn test_lagged_receiver_keeps_going() {
        let shared = SharedStorage::new(MemoryStorage::new());
        let tab_a = shared.connect();
        let tab_b = shared.connect();
        let mut events_b = tab_b.subscribe();

        for i in 0..(EVENT_CAPACITY + 10) {
            tab_a.set_item("k", &i.to_string()).unwrap();
        }

        let event = events_b.recv().await.unwrap();
        assert_eq!(event.origin, tab_a.context());
        assert_ne!(event.new_value.as_deref(), Some("0"));
    }
}
