//! Persisted favorites record
//!
//! Wire format of the durable storage slot:
//!
//! ```json
//! {"ids": ["camper-1", "camper-2"], "hydrated": true, "version": 1}
//! ```
//!
//! Reading is defensive: anything that does not match this shape decodes
//! to `None` instead of an error.

use crate::favorites::{FavoritesState, FAVORITES_VERSION};
use serde_json::Value;

/// Namespaced storage key of the favorites slot
pub const FAVORITES_STORAGE_KEY: &str = "tt:favorites:v1";

/// Decode a stored favorites record
///
/// Returns `None` when the text is not JSON, is not an object, lacks
/// `ids`/`hydrated`/`version`, or carries an unknown version. Non-string
/// entries of `ids` are dropped, as are repeated ids.
///
/// # Examples
/// ```
/// use camper_catalog_common::snapshot::deserialize;
///
/// let state = deserialize(r#"{"ids":["x",123,"y",null],"hydrated":true,"version":1}"#).unwrap();
/// assert_eq!(state.ids, vec!["x", "y"]);
/// assert!(deserialize("not json").is_none());
/// ```
pub fn deserialize(text: &str) -> Option<FavoritesState> {
    let parsed: Value = serde_json::from_str(text).ok()?;
    let obj = parsed.as_object()?;

    let ids = obj.get("ids")?.as_array()?;
    let hydrated = obj.get("hydrated")?.as_bool()?;
    // JSON numbers compare by value: `1` and `1.0` are the same version
    let version = obj.get("version")?.as_f64()?;
    if version != f64::from(FAVORITES_VERSION) {
        return None;
    }

    let mut state = FavoritesState {
        ids: Vec::with_capacity(ids.len()),
        hydrated,
        version: FAVORITES_VERSION,
    };
    for id in ids.iter().filter_map(Value::as_str) {
        state = state.add(id);
    }
    Some(state)
}

/// Encode a favorites state for the storage slot
pub fn serialize(state: &FavoritesState) -> String {
    // A struct of strings, bool and u32 always serializes
    serde_json::to_string(state).unwrap_or_default()
}

/// Compare two states by their ids, ignoring order
///
/// `hydrated` and `version` are not compared.
pub fn is_equal(a: &FavoritesState, b: &FavoritesState) -> bool {
    ids_equal(&a.ids, &b.ids)
}

/// Order-insensitive comparison of id lists
pub fn ids_equal(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut sorted_a: Vec<&String> = a.iter().collect();
    let mut sorted_b: Vec<&String> = b.iter().collect();
    sorted_a.sort();
    sorted_b.sort();
    sorted_a == sorted_b
}
