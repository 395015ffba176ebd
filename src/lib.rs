//! camper-catalog
//!
//! Runtime half of the camper catalog: storage backends, the favorites
//! store with debounced persistence and cross-context sync, plus the CLI
//! plumbing. Pure domain logic lives in `camper-catalog-common`.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod store;
pub mod sync;

pub use error::{CatalogError, Result};
pub use session::{FavoritesSession, SessionOptions};
pub use store::{ChangeSource, FavoritesStore};
