//! Error cases
//!
//! Messages and conversions of the error types

use camper_catalog::config::Config;
use camper_catalog::error::CatalogError;
use camper_catalog::storage::{KeyValueStorage, MemoryStorage};
use camper_catalog_common::{parse_list_json, BookingPayload};
use chrono::NaiveDate;
use tempfile::tempdir;

/// Full storage reports both sizes
#[test]
fn test_quota_exceeded_message() {
    let storage = MemoryStorage::with_quota(4);
    let err = storage.set_item("key", "value").unwrap_err();

    assert!(matches!(err, CatalogError::QuotaExceeded { quota: 4, .. }));
    assert!(err.to_string().contains("4 bytes allowed"));
}

/// Disabled storage
#[test]
fn test_storage_unavailable() {
    let storage = MemoryStorage::new();
    storage.set_unavailable(true);

    let err = storage.get_item("key").unwrap_err();
    assert!(matches!(err, CatalogError::StorageUnavailable));
    assert_eq!(err.to_string(), "Storage is unavailable");
}

/// Unparseable list JSON
#[test]
fn test_invalid_list_json() {
    let err: CatalogError = parse_list_json("{ not json").unwrap_err().into();
    assert!(matches!(err, CatalogError::Common(_)));
    assert!(err.to_string().contains("JSON"));
}

/// Any valid JSON normalizes, even the wrong shape
#[test]
fn test_wrong_shape_is_not_an_error() {
    let page = parse_list_json(r#""just a string""#).unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

/// Corrupt config file
#[test]
fn test_corrupt_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ invalid json }").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, CatalogError::JsonParse(_)));
}

/// Booking errors convert with every message
#[test]
fn test_booking_validation_error() {
    let payload = BookingPayload {
        name: String::new(),
        email: "nobody".to_string(),
        booking_date: "2020-01-01".to_string(),
        comment: String::new(),
    };
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let err: CatalogError = payload.ensure_valid(today).unwrap_err().into();
    assert!(matches!(err, CatalogError::Common(camper_catalog_common::Error::Validation(_))));
    let message = err.to_string();
    assert!(message.contains("Name is required"));
    assert!(message.contains("Please enter a valid email address"));
    assert!(message.contains("Booking date must be in the future"));
}
