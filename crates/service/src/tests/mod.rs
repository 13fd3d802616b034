//! Test doubles and module declarations for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use repairdesk_core::{BookingOutcome, Quotation, Shop, TaskState};
use repairdesk_remote::{
    CallReport, PollPolicy, RemoteError, TaskClient, TaskHandle, TaskOutput, TaskPayload,
    TaskStatus,
};
use repairdesk_storage::{SessionRecord, SessionStore};
use tokio::sync::Mutex;
use tokio::time::Instant;

mod booking_tests;

type Responder = Box<dyn Fn(&TaskPayload) -> Result<TaskStatus, RemoteError> + Send + Sync>;
type CreateFilter = Box<dyn Fn(&TaskPayload) -> bool + Send + Sync>;

/// Scripted task client: every task stays pending for `delay`, then answers
/// with whatever `respond` returns for its payload.
pub struct FakeTaskClient {
    delay: Duration,
    respond: Responder,
    reject: CreateFilter,
    tasks: std::sync::Mutex<HashMap<String, (Instant, TaskPayload)>>,
    next_id: AtomicUsize,
}

impl FakeTaskClient {
    pub fn new(
        delay: Duration,
        respond: impl Fn(&TaskPayload) -> Result<TaskStatus, RemoteError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            delay,
            respond: Box::new(respond),
            reject: Box::new(|_| false),
            tasks: std::sync::Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    /// Payloads matching `reject` fail at creation with a 400.
    pub fn rejecting(mut self, reject: impl Fn(&TaskPayload) -> bool + Send + Sync + 'static) -> Self {
        self.reject = Box::new(reject);
        self
    }

    pub fn created(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

#[async_trait]
impl TaskClient for FakeTaskClient {
    async fn create_task(&self, payload: &TaskPayload) -> Result<TaskHandle, RemoteError> {
        if (self.reject)(payload) {
            return Err(RemoteError::HttpStatus { code: 400, body: "rejected".to_owned() });
        }
        let id = format!("fake-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tasks.lock().unwrap().insert(id.clone(), (Instant::now(), payload.clone()));
        Ok(TaskHandle::new(payload.kind(), id))
    }

    async fn get_status(&self, handle: &TaskHandle) -> Result<TaskStatus, RemoteError> {
        let (started, payload) = self
            .tasks
            .lock()
            .unwrap()
            .get(&handle.id)
            .cloned()
            .ok_or_else(|| RemoteError::UnknownTask(handle.id.clone()))?;
        if started.elapsed() < self.delay {
            return Ok(TaskStatus::pending());
        }
        (self.respond)(&payload)
    }
}

/// In-memory [`SessionStore`].
pub struct MemoryStore<T> {
    records: Mutex<HashMap<String, T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self { records: Mutex::new(HashMap::new()) }
    }
}

#[async_trait]
impl<T: SessionRecord> SessionStore<T> for MemoryStore<T> {
    async fn persist(&self, session: &T) {
        self.records.lock().await.insert(session.record_id().to_owned(), session.clone());
    }

    async fn load(&self, id: &str) -> Option<T> {
        self.records.lock().await.get(id).cloned()
    }

    async fn load_all(&self) -> HashMap<String, T> {
        self.records.lock().await.clone()
    }
}

pub fn policy() -> PollPolicy {
    PollPolicy::new(Duration::from_secs(1), Duration::from_secs(60))
}

pub fn shops(names: &[&str]) -> Vec<Shop> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Shop::new(*name, format!("+1408555{:04}", 100 + i), "1 Test Way"))
        .collect()
}

pub fn shop_name(payload: &TaskPayload) -> &str {
    match payload {
        TaskPayload::QuoteCall(request) => &request.shop.name,
        TaskPayload::BookingCall(request) => &request.shop.name,
        TaskPayload::Research(request) => &request.location,
    }
}

pub fn quote_status(price: Option<f64>) -> TaskStatus {
    TaskStatus {
        state: TaskState::Succeeded,
        output: Some(TaskOutput::Quote {
            report: CallReport::default(),
            quotation: price.map(|price| Quotation {
                price,
                estimated_duration: Some("2 days".to_owned()),
                notes: None,
            }),
        }),
    }
}

pub fn booking_status(booked: bool) -> TaskStatus {
    TaskStatus {
        state: TaskState::Succeeded,
        output: Some(TaskOutput::Booking {
            report: CallReport::default(),
            outcome: Some(BookingOutcome {
                appointment_booked: booked,
                appointment_date: booked.then(|| "2026-10-21".to_owned()),
                appointment_time: booked.then(|| "09:30".to_owned()),
                confirmation_number: booked.then(|| "CONF-1".to_owned()),
                instructions: None,
            }),
        }),
    }
}

pub fn shops_status(found: Vec<Shop>) -> TaskStatus {
    TaskStatus { state: TaskState::Succeeded, output: Some(TaskOutput::Shops(found)) }
}
