use super::{create_test_dir, create_test_session};
use crate::snapshot_store::JsonSnapshotStore;
use crate::traits::SessionStore;
use repairdesk_core::{
    BookingSession, CallResult, CallSession, SessionStatus, ShopContact, TaskState,
};

#[tokio::test]
async fn test_persist_and_load_session() {
    let dir = create_test_dir();
    let store = JsonSnapshotStore::<CallSession>::open(dir.path().join("calls.json")).unwrap();
    let session = create_test_session(&["a", "b"]);

    store.persist(&session).await;

    let loaded = store.load(&session.session_id).await.unwrap();
    assert_eq!(loaded, session);
    assert!(store.load("missing").await.is_none());
}

#[tokio::test]
async fn test_store_survives_reopen() {
    let dir = create_test_dir();
    let path = dir.path().join("calls.json");
    let mut session = create_test_session(&["a", "b"]);
    {
        let store = JsonSnapshotStore::<CallSession>::open(&path).unwrap();
        store.persist(&session).await;
        let pending = session
            .call_ids
            .iter()
            .zip(&session.shops)
            .map(|(id, shop)| CallResult::pending(id.clone(), shop.clone()))
            .collect();
        session.record_poll_cycle(pending);
        store.persist(&session).await;
    }

    let reopened = JsonSnapshotStore::<CallSession>::open(&path).unwrap();
    let all = reopened.load_all().await;
    assert_eq!(all.len(), 1);
    let loaded = &all[&session.session_id];
    assert_eq!(loaded.status, SessionStatus::Calling);
    assert_eq!(loaded.results.as_ref().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_persist_overwrites_full_record() {
    let dir = create_test_dir();
    let store = JsonSnapshotStore::<CallSession>::open(dir.path().join("calls.json")).unwrap();
    let mut session = create_test_session(&["a"]);
    store.persist(&session).await;

    session.record_poll_cycle(vec![CallResult {
        state: TaskState::Failed,
        ..CallResult::pending("call-a", session.shops[0].clone())
    }]);
    store.persist(&session).await;

    let loaded = store.load(&session.session_id).await.unwrap();
    assert_eq!(loaded.status, SessionStatus::Completed);
    assert!(loaded.analysis.is_some());
}

#[tokio::test]
async fn test_missing_file_opens_empty() {
    let dir = create_test_dir();
    let store =
        JsonSnapshotStore::<BookingSession>::open(dir.path().join("nested/bookings.json")).unwrap();
    assert!(store.load_all().await.is_empty());
}

#[tokio::test]
async fn test_persist_creates_parent_dirs() {
    let dir = create_test_dir();
    let path = dir.path().join("nested/deeper/bookings.json");
    let store = JsonSnapshotStore::<BookingSession>::open(&path).unwrap();
    let booking = BookingSession::new(
        "call-1",
        ShopContact { name: "A".to_owned(), phone: "+1".to_owned(), address: String::new() },
        "Sam",
        "+14085550199",
        "dent",
        "2026-10-20",
        chrono::Utc::now(),
    );
    store.persist(&booking).await;

    assert!(path.exists());
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("bookingId"));
}

#[tokio::test]
async fn test_corrupt_snapshot_is_an_error() {
    let dir = create_test_dir();
    let path = dir.path().join("calls.json");
    std::fs::write(&path, "{not json").unwrap();
    let err = JsonSnapshotStore::<CallSession>::open(&path).unwrap_err();
    assert!(err.to_string().contains("data corruption"));
}

#[tokio::test]
async fn test_failed_flush_keeps_memory_state() {
    let dir = create_test_dir();
    let path = dir.path().join("calls.json");
    let store = JsonSnapshotStore::<CallSession>::open(&path).unwrap();
    // A non-empty directory in place of the snapshot file makes the rename fail.
    std::fs::create_dir_all(path.join("blocker")).unwrap();

    let session = create_test_session(&["a"]);
    store.persist(&session).await;

    assert!(store.flush().await.is_err());
    assert_eq!(store.load(&session.session_id).await, Some(session));
}
