//! Camper Catalog Common Library
//!
//! Pure domain logic shared by the CLI and any front end: the API record
//! normalizer, the favorites state and its storage format, catalog
//! filtering and booking validation. Nothing here touches storage or
//! clocks.

pub mod booking;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod parser;
pub mod snapshot;
pub mod types;

pub use booking::{BookingErrors, BookingPayload};
pub use catalog::{filter_campers, query_params, Filters, LoadStatus, Pagination};
pub use error::{Error, Result};
pub use favorites::{FavoritesAction, FavoritesState, FAVORITES_VERSION};
pub use parser::{parse_camper, parse_campers, parse_list_json, parse_list_response};
pub use snapshot::{deserialize, is_equal, serialize, FAVORITES_STORAGE_KEY};
pub use types::{Camper, CamperDetails, CamperType, CampersPage, FeatureKey, Features, Review};
