//! Favorites survive a restart through file-backed storage

use camper_catalog::storage::{FileStorage, KeyValueStorage, MemoryStorage, SharedStorage};
use camper_catalog::{FavoritesSession, SessionOptions};
use camper_catalog_common::{FavoritesState, FAVORITES_STORAGE_KEY};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn options(debounce_ms: u64) -> SessionOptions {
    SessionOptions {
        debounce: Duration::from_millis(debounce_ms),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_favorites_restored_after_restart() {
    let dir = tempdir().expect("Failed to create temp dir");

    let session = FavoritesSession::boot(SharedStorage::new(FileStorage::new(dir.path())).connect(), options(50));
    assert!(session.store().is_hydrated());
    assert_eq!(session.store().count(), 0);

    session.toggle("camper-1");
    session.add("camper-2");
    session.toggle("camper-3");
    session.remove("camper-2");
    session.shutdown().await;

    let stored = FileStorage::new(dir.path())
        .get_item(FAVORITES_STORAGE_KEY)
        .unwrap()
        .expect("record written on shutdown");
    let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(value["ids"], serde_json::json!(["camper-1", "camper-3"]));
    assert_eq!(value["hydrated"], true);
    assert_eq!(value["version"], 1);

    let restarted = FavoritesSession::boot(SharedStorage::new(FileStorage::new(dir.path())).connect(), options(50));
    assert!(restarted.store().is_hydrated());
    assert_eq!(restarted.store().ids(), vec!["camper-1", "camper-3"]);
    restarted.shutdown().await;
}

#[tokio::test]
async fn test_malformed_record_boots_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    FileStorage::new(dir.path())
        .set_item(FAVORITES_STORAGE_KEY, r#"{"ids":"camper-1","hydrated":true,"version":1}"#)
        .unwrap();

    let session = FavoritesSession::boot(SharedStorage::new(FileStorage::new(dir.path())).connect(), options(50));
    assert!(session.store().is_hydrated());
    assert_eq!(session.store().count(), 0);

    // Nothing local happened, so the bad record is left alone
    session.shutdown().await;
    let raw = FileStorage::new(dir.path()).get_item(FAVORITES_STORAGE_KEY).unwrap();
    assert_eq!(raw.as_deref(), Some(r#"{"ids":"camper-1","hydrated":true,"version":1}"#));
}

#[tokio::test(start_paused = true)]
async fn test_burst_is_written_once() {
    let backend = Arc::new(MemoryStorage::new());
    let shared = SharedStorage::new(Arc::clone(&backend));
    let session = FavoritesSession::boot(shared.connect(), options(100));

    let observer = shared.connect();
    let mut events = observer.subscribe();

    for id in ["a", "b", "c", "d"] {
        session.toggle(id);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(backend.get_item(FAVORITES_STORAGE_KEY).unwrap(), None);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let event = events.recv().await.expect("one write");
    assert_eq!(
        camper_catalog_common::deserialize(event.new_value.as_deref().unwrap()),
        Some(FavoritesState::with_ids(["a", "b", "c", "d"]))
    );

    let more = tokio::time::timeout(Duration::from_secs(1), events.recv()).await;
    assert!(more.is_err(), "burst produced a second write");

    session.shutdown().await;
}

#[tokio::test]
async fn test_unavailable_storage_keeps_session_working() {
    let backend = Arc::new(MemoryStorage::new());
    backend.set_unavailable(true);

    let session = FavoritesSession::boot(SharedStorage::new(Arc::clone(&backend)).connect(), options(10));
    assert!(session.store().is_hydrated());

    assert!(session.toggle("camper-1"));
    assert!(session.store().is_favorite("camper-1"));
    session.shutdown().await;

    backend.set_unavailable(false);
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_quota_exceeded_is_not_fatal() {
    let backend = Arc::new(MemoryStorage::with_quota(16));
    let session = FavoritesSession::boot(SharedStorage::new(Arc::clone(&backend)).connect(), options(10));

    session.add("a-camper-id-that-does-not-fit");
    assert_eq!(session.store().count(), 1);
    session.shutdown().await;

    assert!(backend.is_empty());
}
