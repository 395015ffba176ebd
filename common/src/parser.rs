//! API record normalizer
//!
//! Converts loosely typed camper records from the catalog API into
//! [`Camper`]. Normalization is total: a missing or wrong-typed field
//! resolves to its default and malformed list entries are skipped, so no
//! input value makes these functions fail.
//!
//! Two encodings are accepted for gallery and review entries:
//! 1. structured objects (`{"thumb": .., "original": ..}`)
//! 2. the legacy flattened string form (`"@{thumb=..; original=..}"`)

use crate::error::Result;
use crate::types::{Camper, CamperDetails, CampersPage, FeatureKey, Features, Review};
use regex::Regex;
use serde_json::{Map, Value};

/// Upper bound of every rating scale
pub const MAX_RATING: f64 = 5.0;

lazy_static::lazy_static! {
    static ref GALLERY_ORIGINAL_RE: Regex = Regex::new(r"original=([^;}\s]+)").unwrap();
    static ref REVIEW_NAME_RE: Regex = Regex::new(r"reviewer_name=([^;}]+)").unwrap();
    static ref REVIEW_RATING_RE: Regex = Regex::new(r"reviewer_rating=([^;}]+)").unwrap();
    static ref REVIEW_COMMENT_RE: Regex = Regex::new(r"comment=([^}]+)").unwrap();
}

/// Normalize one raw API record
///
/// # Examples
/// ```
/// use camper_catalog_common::parse_camper;
/// use serde_json::json;
///
/// let camper = parse_camper(&json!({"id": "2", "name": " Test ", "price": 5000}));
/// assert_eq!(camper.name, "Test");
/// assert_eq!(camper.rating, 0.0);
/// assert!(camper.gallery.is_empty());
/// ```
pub fn parse_camper(raw: &Value) -> Camper {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    let field = |name: &str| obj.get(name).unwrap_or(&Value::Null);

    let reviews = parse_reviews(field("reviews"));
    let rating = match as_number(field("rating")) {
        Some(explicit) => clamp_rating(explicit),
        None => average_rating(&reviews),
    };
    let form = normalize_string(field("form"));

    Camper {
        id: normalize_id(field("id")),
        name: normalize_string(field("name")),
        price: as_number(field("price")).filter(|p| *p >= 0.0).unwrap_or(0.0),
        rating,
        location: normalize_string(field("location")),
        description: normalize_string(field("description")),
        adults: adults_for_form(&form),
        engine: normalize_string(field("engine")),
        transmission: normalize_string(field("transmission")),
        details: CamperDetails {
            length: normalize_string(field("length")),
            width: normalize_string(field("width")),
            height: normalize_string(field("height")),
            tank: normalize_string(field("tank")),
            consumption: normalize_string(field("consumption")),
            form,
        },
        gallery: parse_gallery(field("gallery")),
        reviews,
        features: parse_features(obj),
    }
}

/// Normalize a batch, preserving order
pub fn parse_campers(raw: &[Value]) -> Vec<Camper> {
    raw.iter().map(parse_camper).collect()
}

/// Normalize a list endpoint response
///
/// Accepts `{"total": n, "items": [..]}` or a bare array. `total` falls
/// back to the number of items when absent. Anything else yields an empty
/// page.
pub fn parse_list_response(raw: &Value) -> CampersPage {
    match raw {
        Value::Array(items) => CampersPage {
            total: items.len(),
            items: parse_campers(items),
        },
        Value::Object(obj) => {
            let items = match obj.get("items") {
                Some(Value::Array(items)) => parse_campers(items),
                _ => Vec::new(),
            };
            let total = obj
                .get("total")
                .and_then(as_number)
                .filter(|t| *t >= 0.0)
                .map(|t| t as usize)
                .unwrap_or(items.len());
            CampersPage { total, items }
        }
        _ => CampersPage::default(),
    }
}

/// Parse JSON text and normalize it as a list response
///
/// Only unparseable text is an error; any JSON value normalizes.
pub fn parse_list_json(text: &str) -> Result<CampersPage> {
    let value: Value = serde_json::from_str(text)?;
    Ok(parse_list_response(&value))
}

/// Trimmed string, or `""` for anything that is not a string
pub fn normalize_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Boolean-like flag as 0/1
///
/// Booleans map directly, numbers are 1 when positive, and strings are 1
/// for `true`, `1` or `yes` (case-insensitive).
pub fn normalize_flag(value: &Value) -> u32 {
    let on = match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n > 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    };
    u32::from(on)
}

/// Mean of review ratings rounded to the nearest 0.5, clamped to 0-5
///
/// Returns 0 with no reviews.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: f64 = reviews.iter().map(|r| r.reviewer_rating).sum();
    let average = sum / reviews.len() as f64;
    clamp_rating((average * 2.0).round() / 2.0)
}

/// Sleeping capacity derived from the body form
pub fn adults_for_form(form: &str) -> u32 {
    let form = form.to_lowercase();
    if form.contains("large") || form.contains("family") {
        6
    } else if form.contains("small") || form.contains("panel") {
        2
    } else {
        4
    }
}

fn normalize_id(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => normalize_string(other),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn clamp_rating(rating: f64) -> f64 {
    rating.clamp(0.0, MAX_RATING)
}

fn parse_features(obj: &Map<String, Value>) -> Features {
    let mut features = Features::default();
    for key in FeatureKey::ALL {
        if let Some(api_field) = key.api_field() {
            features.set(key, normalize_flag(obj.get(api_field).unwrap_or(&Value::Null)));
        }
    }
    // beds and CD have no source flag and stay 0
    features
}

fn parse_gallery(value: &Value) -> Vec<String> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };

    entries.iter().filter_map(gallery_url).collect()
}

fn gallery_url(entry: &Value) -> Option<String> {
    let candidate = match entry {
        Value::String(s) => match GALLERY_ORIGINAL_RE.captures(s) {
            Some(caps) => caps[1].to_string(),
            None => s.clone(),
        },
        Value::Object(obj) => obj
            .get("original")
            .and_then(Value::as_str)
            .or_else(|| obj.get("thumb").and_then(Value::as_str))?
            .to_string(),
        _ => return None,
    };

    let url = candidate.trim();
    is_absolute_url(url).then(|| url.to_string())
}

fn is_absolute_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")) && !s.contains(char::is_whitespace)
}

fn parse_reviews(value: &Value) -> Vec<Review> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };

    entries.iter().filter_map(parse_review).collect()
}

fn parse_review(entry: &Value) -> Option<Review> {
    match entry {
        Value::String(s) => parse_legacy_review(s),
        Value::Object(obj) => {
            let known = ["reviewer_name", "reviewer_rating", "comment"];
            if !known.iter().any(|k| obj.contains_key(*k)) {
                return None;
            }
            let name = normalize_string(obj.get("reviewer_name").unwrap_or(&Value::Null));
            Some(Review {
                reviewer_name: non_empty_or_anonymous(name),
                reviewer_rating: obj
                    .get("reviewer_rating")
                    .and_then(as_number)
                    .map(clamp_rating)
                    .unwrap_or(0.0),
                comment: normalize_string(obj.get("comment").unwrap_or(&Value::Null)),
            })
        }
        _ => None,
    }
}

fn parse_legacy_review(s: &str) -> Option<Review> {
    let capture = |re: &Regex| re.captures(s).map(|caps| caps[1].trim().to_string());

    let name = capture(&REVIEW_NAME_RE);
    let rating = capture(&REVIEW_RATING_RE);
    let comment = capture(&REVIEW_COMMENT_RE);
    if name.is_none() && rating.is_none() && comment.is_none() {
        return None;
    }

    Some(Review {
        reviewer_name: non_empty_or_anonymous(name.unwrap_or_default()),
        reviewer_rating: rating
            .and_then(|r| r.parse::<f64>().ok())
            .filter(|r| r.is_finite())
            .map(clamp_rating)
            .unwrap_or(0.0),
        comment: comment.unwrap_or_default(),
    })
}

fn non_empty_or_anonymous(name: String) -> String {
    if name.is_empty() {
        Review::default().reviewer_name
    } else {
        name
    }
}
