//! Favorites state
//!
//! The favorites set is a plain value with pure transitions. Every
//! operation consumes the current state and returns the next one; nothing
//! here performs I/O, so the runtime that persists and synchronizes the
//! set lives outside this crate.

use serde::{Deserialize, Serialize};

/// Schema tag of the persisted favorites record
pub const FAVORITES_VERSION: u32 = 1;

/// Favorited camper ids
///
/// `ids` keeps insertion order and never holds the same id twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesState {
    pub ids: Vec<String>,
    pub hydrated: bool,
    pub version: u32,
}

impl Default for FavoritesState {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            hydrated: false,
            version: FAVORITES_VERSION,
        }
    }
}

/// State transitions accepted by [`FavoritesState::reduce`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesAction {
    Toggle(String),
    Add(String),
    Remove(String),
    Hydrate(FavoritesState),
    Clear,
}

impl FavoritesState {
    /// Hydrated state with the given ids, as written to storage
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self {
            hydrated: true,
            ..Self::default()
        };
        for id in ids {
            state = state.add(id.into());
        }
        state
    }

    pub fn reduce(self, action: FavoritesAction) -> Self {
        match action {
            FavoritesAction::Toggle(id) => self.toggle(id),
            FavoritesAction::Add(id) => self.add(id),
            FavoritesAction::Remove(id) => self.remove(&id),
            FavoritesAction::Hydrate(snapshot) => self.hydrate(snapshot),
            FavoritesAction::Clear => self.clear(),
        }
    }

    /// Remove `id` if present, append it otherwise
    pub fn toggle(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        match self.position(&id) {
            Some(index) => {
                self.ids.remove(index);
            }
            None => self.ids.push(id),
        }
        self
    }

    /// Append `id` unless it is already present
    pub fn add(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if self.position(&id).is_none() {
            self.ids.push(id);
        }
        self
    }

    /// Remove `id`; an absent id leaves the state unchanged
    pub fn remove(mut self, id: &str) -> Self {
        if let Some(index) = self.position(id) {
            self.ids.remove(index);
        }
        self
    }

    /// Replace ids and version from a snapshot and mark the state hydrated.
    ///
    /// The only transition that sets `hydrated`.
    pub fn hydrate(self, snapshot: FavoritesState) -> Self {
        Self {
            ids: snapshot.ids,
            hydrated: true,
            version: snapshot.version,
        }
    }

    /// Empty the set, keeping `hydrated` and `version`
    pub fn clear(mut self) -> Self {
        self.ids.clear();
        self
    }

    // Selectors

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrated(ids: &[&str]) -> FavoritesState {
        FavoritesState::with_ids(ids.iter().copied())
    }

    #[test]
    fn test_initial_state() {
        let state = FavoritesState::default();
        assert!(state.ids.is_empty());
        assert!(!state.hydrated);
        assert_eq!(state.version, 1);
    }

    #[test]
    fn test_toggle_appends_then_removes() {
        let state = FavoritesState::default().toggle("camper-1");
        assert_eq!(state.ids, vec!["camper-1"]);

        let state = state.toggle("camper-1");
        assert!(state.ids.is_empty());
    }

    #[test]
    fn test_toggle_parity() {
        for count in 0..6 {
            let mut state = hydrated(&["a", "b"]);
            for _ in 0..count {
                state = state.toggle("a");
            }
            assert_eq!(state.is_favorite("a"), count % 2 == 0, "after {count} toggles");
            assert!(state.is_favorite("b"));
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let once = FavoritesState::default().add("camper-1");
        let twice = once.clone().add("camper-1");
        assert_eq!(once, twice);
        assert_eq!(twice.ids, vec!["camper-1"]);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let state = FavoritesState::default().add("c").add("a").add("b").add("a");
        assert_eq!(state.ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_remove() {
        let state = FavoritesState::default().add("camper-1").add("camper-2");
        let state = state.remove("camper-1");
        assert_eq!(state.ids, vec!["camper-2"]);

        let unchanged = state.clone().remove("camper-3");
        assert_eq!(unchanged, state);
    }

    #[test]
    fn test_hydrate_replaces_everything() {
        let before = FavoritesState::default().add("old");
        let snapshot = FavoritesState {
            ids: vec!["camper-1".to_string(), "camper-2".to_string()],
            hydrated: false,
            version: 1,
        };

        let after = before.hydrate(snapshot.clone());
        assert_eq!(after.ids, snapshot.ids);
        assert_eq!(after.version, snapshot.version);
        assert!(after.hydrated);
    }

    #[test]
    fn test_clear_keeps_flags() {
        let state = hydrated(&["a", "b"]).clear();
        assert!(state.ids.is_empty());
        assert!(state.hydrated);
        assert_eq!(state.version, FAVORITES_VERSION);

        let fresh = FavoritesState::default().add("x").clear();
        assert!(!fresh.hydrated);
    }

    #[test]
    fn test_only_hydrate_sets_hydrated() {
        let state = FavoritesState::default()
            .reduce(FavoritesAction::Add("a".into()))
            .reduce(FavoritesAction::Toggle("b".into()))
            .reduce(FavoritesAction::Remove("a".into()))
            .reduce(FavoritesAction::Clear);
        assert!(!state.is_hydrated());

        let state = state.reduce(FavoritesAction::Hydrate(FavoritesState::default()));
        assert!(state.is_hydrated());
    }

    #[test]
    fn test_selectors() {
        let state = hydrated(&["camper-1", "camper-2"]);
        assert_eq!(state.ids(), ["camper-1", "camper-2"]);
        assert!(state.is_favorite("camper-1"));
        assert!(!state.is_favorite("camper-3"));
        assert_eq!(state.count(), 2);
        assert!(state.is_hydrated());
    }
}
