use anyhow::Result;
use repairdesk_core::{AppConfig, BookingSession, CallSession};
use repairdesk_storage::{JsonSnapshotStore, SessionStore};

pub(crate) async fn print_call_sessions(config: &AppConfig) -> Result<()> {
    let store: JsonSnapshotStore<CallSession> =
        JsonSnapshotStore::open(config.call_sessions_path())?;
    let mut sessions: Vec<CallSession> = store.load_all().await.into_values().collect();
    sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    println!("{}", serde_json::to_string_pretty(&sessions)?);
    Ok(())
}

pub(crate) async fn print_bookings(config: &AppConfig) -> Result<()> {
    let store: JsonSnapshotStore<BookingSession> =
        JsonSnapshotStore::open(config.booking_sessions_path())?;
    let mut bookings: Vec<BookingSession> = store.load_all().await.into_values().collect();
    bookings.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    println!("{}", serde_json::to_string_pretty(&bookings)?);
    Ok(())
}
