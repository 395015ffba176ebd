//! Trailing-edge debounced writes
//!
//! Each [`DebouncedWriter::schedule`] call replaces the pending snapshot
//! and restarts the timer, so a burst of changes ends in a single write of
//! the last state once the writer has been quiet for `delay`.

use super::FavoritesPersistence;
use crate::storage::KeyValueStorage;
use camper_catalog_common::FavoritesState;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default quiet period before a write
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Debounced writer for the favorites slot
///
/// Timers run as Tokio tasks, so scheduling must happen inside a runtime.
/// Dropping the writer cancels a pending write.
pub struct DebouncedWriter<S: KeyValueStorage + 'static> {
    persistence: Arc<FavoritesPersistence<S>>,
    delay: Duration,
    pending: Arc<Mutex<Pending>>,
    timer: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Pending {
    generation: u64,
    state: Option<FavoritesState>,
}

impl<S: KeyValueStorage + 'static> DebouncedWriter<S> {
    pub fn new(persistence: Arc<FavoritesPersistence<S>>, delay: Duration) -> Self {
        Self {
            persistence,
            delay,
            pending: Arc::new(Mutex::new(Pending::default())),
            timer: None,
        }
    }

    /// Replace the pending snapshot and restart the timer
    pub fn schedule(&mut self, state: FavoritesState) {
        self.abort_timer();

        let generation = {
            let mut pending = lock(&self.pending);
            pending.generation += 1;
            pending.state = Some(state);
            pending.generation
        };

        let pending = Arc::clone(&self.pending);
        let persistence = Arc::clone(&self.persistence);
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // A newer schedule, flush or cancel owns the snapshot now.
            // The lock is held through the write so `cancel` returns only
            // once an in-flight write has landed.
            let mut pending = lock(&pending);
            if pending.generation != generation {
                return;
            }
            if let Some(state) = pending.state.take() {
                debug!(count = state.ids.len(), "debounced favorites write");
                persistence.write(&state);
            }
        }));
    }

    /// Write the pending snapshot now, if any
    pub fn flush(&mut self) {
        self.abort_timer();
        if let Some(state) = self.take_pending() {
            self.persistence.write(&state);
        }
    }

    /// Drop the pending snapshot without writing it. A write already in
    /// progress is waited for, not undone.
    pub fn cancel(&mut self) {
        self.abort_timer();
        self.take_pending();
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).state.is_some()
    }

    fn take_pending(&self) -> Option<FavoritesState> {
        let mut pending = lock(&self.pending);
        pending.generation += 1;
        pending.state.take()
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<S: KeyValueStorage + 'static> Drop for DebouncedWriter<S> {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
