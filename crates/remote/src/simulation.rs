//! In-process stand-in for the remote APIs.
//!
//! Used when credentials for a job kind are missing. Tasks report `pending`
//! until the configured delay has elapsed, then produce deterministic output
//! derived from the request.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use repairdesk_core::{BookingOutcome, Quotation, TaskState, fallback_shops};
use tokio::time::Instant;

use crate::error::RemoteError;
use crate::types::{CallReport, TaskHandle, TaskOutput, TaskPayload, TaskStatus};

pub const SIMULATED_ID_PREFIX: &str = "sim-";

struct SimulatedTask {
    started: Instant,
    payload: TaskPayload,
}

pub struct Simulator {
    delay: Duration,
    tasks: Mutex<HashMap<String, SimulatedTask>>,
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tasks = self.tasks.lock().map_or(0, |t| t.len());
        f.debug_struct("Simulator").field("delay", &self.delay).field("tasks", &tasks).finish()
    }
}

impl Simulator {
    pub fn new(delay: Duration) -> Self {
        Self { delay, tasks: Mutex::new(HashMap::new()) }
    }

    pub fn is_simulated_id(id: &str) -> bool {
        id.starts_with(SIMULATED_ID_PREFIX)
    }

    pub fn create(&self, payload: &TaskPayload) -> TaskHandle {
        let kind = payload.kind();
        let id = format!("{SIMULATED_ID_PREFIX}{kind}-{}", uuid::Uuid::new_v4());
        tracing::info!(kind = %kind, id = %id, "simulating remote task");
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), SimulatedTask { started: Instant::now(), payload: payload.clone() });
        TaskHandle::new(kind, id)
    }

    /// Reports a task's state. A task is forgotten once it has reported
    /// success, so each id yields its output exactly once.
    ///
    /// # Errors
    /// Returns [`RemoteError::UnknownTask`] for ids this simulator never
    /// issued or has already finished, and
    /// [`RemoteError::KindMismatch`] when the handle's kind disagrees with
    /// the stored payload.
    pub fn status(&self, handle: &TaskHandle) -> Result<TaskStatus, RemoteError> {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let task = tasks.get(&handle.id).ok_or_else(|| RemoteError::UnknownTask(handle.id.clone()))?;
        let stored = task.payload.kind();
        if stored != handle.kind {
            return Err(RemoteError::KindMismatch { expected: stored, got: handle.kind });
        }
        if task.started.elapsed() < self.delay {
            return Ok(TaskStatus::pending());
        }
        let output = simulated_output(&task.payload);
        tasks.remove(&handle.id);
        Ok(TaskStatus { state: TaskState::Succeeded, output: Some(output) })
    }
}

fn simulated_output(payload: &TaskPayload) -> TaskOutput {
    match payload {
        TaskPayload::Research(_) => TaskOutput::Shops(fallback_shops()),
        TaskPayload::QuoteCall(request) => {
            let price = simulated_price(&request.shop.name);
            let days = 2 + name_hash(&request.shop.name) % 4;
            TaskOutput::Quote {
                report: CallReport {
                    transcript: Some(format!(
                        "AI: Hi, I'm calling about a repair quote for {}.\n\
                         Shop: We can do that for about ${price:.0}.",
                        request.damage_description
                    )),
                    summary: Some(format!("{} quoted ${price:.2}.", request.shop.name)),
                    ended_reason: Some("simulated".to_owned()),
                },
                quotation: Some(Quotation {
                    price,
                    estimated_duration: Some(format!("{days} days")),
                    notes: Some("Simulated quotation".to_owned()),
                }),
            }
        },
        TaskPayload::BookingCall(request) => {
            let confirmation = format!("SIM-{:06}", name_hash(&request.shop.name) % 1_000_000);
            TaskOutput::Booking {
                report: CallReport {
                    transcript: None,
                    summary: Some(format!(
                        "Booked {} at {} for {}.",
                        request.customer_name, request.shop.name, request.requested_date
                    )),
                    ended_reason: Some("simulated".to_owned()),
                },
                outcome: Some(BookingOutcome {
                    appointment_booked: true,
                    appointment_date: Some(request.requested_date.clone()),
                    appointment_time: Some("10:00 AM".to_owned()),
                    confirmation_number: Some(confirmation),
                    instructions: Some("Bring the vehicle to the front desk.".to_owned()),
                }),
            }
        },
    }
}

fn name_hash(name: &str) -> u64 {
    name.bytes().fold(0_u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
}

/// Between $250 and $950 in $50 steps, stable per shop name.
fn simulated_price(name: &str) -> f64 {
    let step = u32::try_from(name_hash(name) % 15).unwrap_or(0);
    f64::from(step).mul_add(50.0, 250.0)
}
