use std::time::Duration;

use fleet_core::FakeClock;
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

use super::*;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct TestDoc {
    n: u32,
}

#[tokio::test]
async fn load_missing_file_returns_default() {
    let dir = tempdir().unwrap();
    let store: AtomicStore<TestDoc, _> = AtomicStore::new(dir.path().join("missing.json"), FakeClock::new());
    assert_eq!(store.load().await.unwrap(), TestDoc::default());
}

#[tokio::test]
async fn flush_writes_atomically_and_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let store: AtomicStore<TestDoc, _> = AtomicStore::new(&path, FakeClock::new());

    store.schedule_save(TestDoc { n: 7 });
    store.flush().await.unwrap();

    assert!(path.exists());
    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, TestDoc { n: 7 });
}

#[tokio::test]
async fn corrupt_file_is_backed_up_and_load_returns_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    tokio::fs::write(&path, b"not json").await.unwrap();

    let store: AtomicStore<TestDoc, _> = AtomicStore::new(&path, FakeClock::new());
    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, TestDoc::default());

    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    let mut saw_backup = false;
    while let Some(entry) = entries.next_entry().await.unwrap() {
        if entry.file_name().to_string_lossy().contains(".corrupt-") {
            saw_backup = true;
        }
    }
    assert!(saw_backup);
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    tokio::fs::write(&path, vec![b'0'; 64]).await.unwrap();

    let store: AtomicStore<TestDoc, _> = AtomicStore::new(&path, FakeClock::new()).with_max_bytes(8);
    let result = store.load().await;
    assert!(matches!(result, Err(PersistenceError::TooLarge { .. })));
}

#[tokio::test(start_paused = true)]
async fn schedule_save_coalesces_bursts_into_one_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let store: AtomicStore<TestDoc, _> =
        AtomicStore::new(&path, FakeClock::new()).with_debounce(Duration::from_millis(500));

    store.schedule_save(TestDoc { n: 1 });
    store.schedule_save(TestDoc { n: 2 });
    store.schedule_save(TestDoc { n: 3 });

    tokio::time::advance(Duration::from_millis(600)).await;
    tokio::task::yield_now().await;

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, TestDoc { n: 3 });
}
