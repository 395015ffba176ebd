//! Durable key-value slots
//!
//! [`KeyValueStorage`] is the seam between the favorites runtime and
//! wherever the text actually lives:
//! - [`MemoryStorage`]: in-process map, can simulate a full or disabled store
//! - [`FileStorage`]: one file per key under a directory
//! - [`SharedStorage`]: any backend shared by several execution contexts,
//!   with change notifications delivered to the other contexts

mod file;
mod memory;
mod shared;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use shared::{ContextId, SharedStorage, StorageEvent, StorageEvents, TabStorage};

use crate::error::Result;
use std::sync::Arc;

/// Text slots addressed by key
pub trait KeyValueStorage: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key succeeds
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}
