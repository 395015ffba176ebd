//! Catalog listing helpers
//!
//! Filtering, pagination bookkeeping and list presentation for the camper
//! catalog. The HTTP request itself is made elsewhere; this module only
//! builds its query parameters and folds its results.

use crate::types::{Camper, CamperType, FeatureKey, Review};
use serde::{Deserialize, Serialize};

/// Default page size of the list endpoint
pub const DEFAULT_PAGE_LIMIT: usize = 4;

/// Active catalog filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub location: Option<String>,
    pub camper_type: Option<CamperType>,
    pub features: Vec<FeatureKey>,
}

impl Filters {
    /// Add the feature if missing, remove it otherwise
    pub fn toggle_feature(&mut self, feature: FeatureKey) {
        match self.features.iter().position(|f| *f == feature) {
            Some(index) => {
                self.features.remove(index);
            }
            None => self.features.push(feature),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.location.as_deref().is_none_or(|l| l.trim().is_empty())
            && self.camper_type.is_none()
            && self.features.is_empty()
    }

    /// Whether one camper passes every active filter
    pub fn matches(&self, camper: &Camper) -> bool {
        if let Some(location) = self.location.as_deref().map(str::trim) {
            if !location.is_empty()
                && !camper
                    .location
                    .to_lowercase()
                    .contains(&location.to_lowercase())
            {
                return false;
            }
        }

        if let Some(camper_type) = self.camper_type {
            if !camper.details.form.eq_ignore_ascii_case(camper_type.form()) {
                return false;
            }
        }

        self.features
            .iter()
            .all(|feature| camper.features.get(*feature) > 0)
    }
}

/// Campers passing `filters`, order preserved
pub fn filter_campers<'a>(campers: &'a [Camper], filters: &Filters) -> Vec<&'a Camper> {
    campers.iter().filter(|c| filters.matches(c)).collect()
}

/// Query parameters for one list request
///
/// Order: `page`, `limit`, `location`, `form`, then one `<flag>=true` per
/// requested feature, mapped back to its API flag. Features without a
/// source flag are skipped and a flag is never repeated.
pub fn query_params(page: usize, limit: usize, filters: &Filters) -> Vec<(String, String)> {
    let mut params = vec![
        ("page".to_string(), page.to_string()),
        ("limit".to_string(), limit.to_string()),
    ];

    if let Some(location) = filters.location.as_deref().map(str::trim) {
        if !location.is_empty() {
            params.push(("location".to_string(), location.to_string()));
        }
    }

    if let Some(camper_type) = filters.camper_type {
        params.push(("form".to_string(), camper_type.form().to_string()));
    }

    for field in filters.features.iter().filter_map(FeatureKey::api_field) {
        if !params.iter().any(|(name, _)| name == field) {
            params.push((field.to_string(), "true".to_string()));
        }
    }

    params
}

/// Request status of the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Pagination bookkeeping for "load more" listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub has_more: bool,
    pub status: LoadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl Pagination {
    pub fn new(limit: usize) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            has_more: true,
            status: LoadStatus::Idle,
            error: None,
        }
    }

    /// Page to request for "load more"
    pub fn next_page(&self) -> usize {
        self.page + 1
    }

    pub fn begin(&mut self) {
        self.status = LoadStatus::Loading;
        self.error = None;
    }

    /// First page arrived with `received` items
    pub fn first_page_loaded(&mut self, received: usize) {
        self.page = 1;
        self.finish(received);
    }

    /// Following page arrived with `received` items
    pub fn next_page_loaded(&mut self, received: usize) {
        self.page += 1;
        self.finish(received);
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        self.status = LoadStatus::Failed;
        self.error = Some(message.into());
    }

    /// Back to page one, keeping the page size
    pub fn reset(&mut self) {
        *self = Self::new(self.limit);
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    fn finish(&mut self, received: usize) {
        // A short page means the list is exhausted
        self.has_more = received == self.limit;
        self.status = LoadStatus::Succeeded;
        self.error = None;
    }
}

/// `€10000.00`
pub fn format_price(price: f64) -> String {
    format!("€{:.2}", price)
}

/// Display names of the features a camper has, in table order
pub fn available_features(camper: &Camper) -> Vec<&'static str> {
    camper
        .features
        .present()
        .into_iter()
        .map(|key| key.display_name())
        .collect()
}

/// Display average of reviews, one decimal place
pub fn review_average(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: f64 = reviews.iter().map(|r| r.reviewer_rating).sum();
    (sum / reviews.len() as f64 * 10.0).round() / 10.0
}
