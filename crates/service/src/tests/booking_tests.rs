use std::sync::Arc;
use std::time::Duration;

use repairdesk_core::{BookingSession, SessionStatus, Shop, TaskState};
use repairdesk_remote::TaskStatus;
use repairdesk_storage::SessionStore;

use super::{FakeTaskClient, MemoryStore, booking_status, policy, shops};
use crate::booking::{BookingRequest, BookingService};
use crate::ServiceError;

fn service(client: FakeTaskClient) -> (BookingService, Arc<MemoryStore<BookingSession>>) {
    let store = Arc::new(MemoryStore::default());
    let service = BookingService::new(Arc::new(client), Arc::clone(&store) as _, policy());
    (service, store)
}

fn request() -> BookingRequest {
    BookingRequest {
        shop: shops(&["Precision Auto Body"]).remove(0),
        damage_description: "bent door frame".to_owned(),
        customer_name: "Jordan Park".to_owned(),
        customer_phone: "+14085550777".to_owned(),
        preferred_time: Some("2026-10-21 morning".to_owned()),
    }
}

#[tokio::test(start_paused = true)]
async fn test_booked_call_completes() {
    let (service, _) = service(FakeTaskClient::new(Duration::from_secs(3), |_| Ok(booking_status(true))));

    let started = service.start_booking(request()).await.unwrap();
    assert_eq!(started.requested_date, "2026-10-21 morning");
    assert!(started.error.is_none());

    let pending = service.get_booking_status(&started.booking_id).await.unwrap();
    assert_eq!(pending.status, SessionStatus::Calling);

    tokio::time::sleep(Duration::from_secs(10)).await;
    let done = service.get_booking_status(&started.booking_id).await.unwrap();
    assert_eq!(done.status, SessionStatus::Completed);
    assert_eq!(done.result.unwrap().confirmation_number.as_deref(), Some("CONF-1"));
}

#[tokio::test(start_paused = true)]
async fn test_unbooked_call_fails() {
    let (service, _) = service(FakeTaskClient::new(Duration::ZERO, |_| Ok(booking_status(false))));

    let started = service.start_booking(request()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let status = service.get_booking_status(&started.booking_id).await.unwrap();
    assert_eq!(status.status, SessionStatus::Failed);
    assert_eq!(status.result.map(|r| r.appointment_booked), Some(false));
}

#[tokio::test(start_paused = true)]
async fn test_failed_call_fails_booking() {
    let (service, _) = service(FakeTaskClient::new(Duration::ZERO, |_| {
        Ok(TaskStatus { state: TaskState::Failed, output: None })
    }));

    let started = service.start_booking(request()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let status = service.get_booking_status(&started.booking_id).await.unwrap();
    assert_eq!(status.status, SessionStatus::Failed);
    assert!(status.error.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_fails_booking() {
    let (service, _) = service(FakeTaskClient::new(Duration::from_secs(600), |_| Ok(booking_status(true))));

    let started = service.start_booking(request()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(90)).await;

    let status = service.get_booking_status(&started.booking_id).await.unwrap();
    assert_eq!(status.status, SessionStatus::Failed);
    assert!(status.error.unwrap().contains("in time"));
}

#[tokio::test]
async fn test_rejected_call_stores_failed_booking() {
    let client = FakeTaskClient::new(Duration::ZERO, |_| Ok(booking_status(true))).rejecting(|_| true);
    let (service, store) = service(client);

    let started = service.start_booking(request()).await.unwrap();
    assert!(started.error.is_some());
    let stored = store.load(&started.booking_id).await.unwrap();
    assert_eq!(stored.status, SessionStatus::Failed);
}

#[tokio::test]
async fn test_invalid_booking_requests() {
    let (service, _) = service(FakeTaskClient::new(Duration::ZERO, |_| Ok(booking_status(true))));

    let nameless = BookingRequest { customer_name: String::new(), ..request() };
    assert!(matches!(service.start_booking(nameless).await.unwrap_err(), ServiceError::InvalidInput(_)));

    let unreachable = BookingRequest { shop: Shop::new("Ghost Garage", "", ""), ..request() };
    assert!(matches!(
        service.start_booking(unreachable).await.unwrap_err(),
        ServiceError::InvalidInput(_)
    ));

    assert!(service.get_booking_status("nope").await.unwrap_err().is_not_found());
}
