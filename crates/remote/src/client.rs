//! Uniform create/status interface over the research and voice APIs.

use std::time::Duration;

use async_trait::async_trait;
use repairdesk_core::{AppConfig, TaskKind};

use crate::error::RemoteError;
use crate::research::ResearchClient;
use crate::simulation::Simulator;
use crate::types::{TaskHandle, TaskPayload, TaskStatus};
use crate::voice::{CallPurpose, VoiceClient};

/// Creates remote tasks and reports their normalized state.
///
/// Implementations never block waiting for completion; polling is the
/// caller's concern (see [`crate::poll_until_terminal`]).
#[async_trait]
pub trait TaskClient: Send + Sync {
    async fn create_task(&self, payload: &TaskPayload) -> Result<TaskHandle, RemoteError>;

    async fn get_status(&self, handle: &TaskHandle) -> Result<TaskStatus, RemoteError>;
}

/// Production client: real APIs where credentials exist, simulation elsewhere.
#[derive(Debug)]
pub struct ExternalTaskClient {
    research: Option<ResearchClient>,
    voice: Option<VoiceClient>,
    simulator: Simulator,
}

impl ExternalTaskClient {
    /// # Errors
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, RemoteError> {
        let research = config.research.as_ref().map(ResearchClient::new).transpose()?;
        let voice = config.voice.as_ref().map(VoiceClient::new).transpose()?;
        if research.is_none() {
            tracing::warn!("research API credentials missing, shop search runs in simulation mode");
        }
        if voice.is_none() {
            tracing::warn!("voice API credentials missing, phone calls run in simulation mode");
        }
        Ok(Self { research, voice, simulator: Simulator::new(config.timings.simulation_delay) })
    }

    /// Every job kind simulated.
    pub fn simulated(delay: Duration) -> Self {
        Self { research: None, voice: None, simulator: Simulator::new(delay) }
    }

    pub const fn is_simulated(&self, kind: TaskKind) -> bool {
        match kind {
            TaskKind::Research => self.research.is_none(),
            TaskKind::QuoteCall | TaskKind::BookingCall => self.voice.is_none(),
        }
    }
}

#[async_trait]
impl TaskClient for ExternalTaskClient {
    async fn create_task(&self, payload: &TaskPayload) -> Result<TaskHandle, RemoteError> {
        let kind = payload.kind();
        let id = match (payload, &self.research, &self.voice) {
            (TaskPayload::Research(request), Some(research), _) => research.create(request).await?,
            (TaskPayload::QuoteCall(request), _, Some(voice)) => voice.create_quote_call(request).await?,
            (TaskPayload::BookingCall(request), _, Some(voice)) => {
                voice.create_booking_call(request).await?
            },
            _ => return Ok(self.simulator.create(payload)),
        };
        tracing::info!(kind = %kind, id = %id, "remote task created");
        Ok(TaskHandle::new(kind, id))
    }

    async fn get_status(&self, handle: &TaskHandle) -> Result<TaskStatus, RemoteError> {
        if Simulator::is_simulated_id(&handle.id) {
            return self.simulator.status(handle);
        }
        match (handle.kind, &self.research, &self.voice) {
            (TaskKind::Research, Some(research), _) => research.status(&handle.id).await,
            (TaskKind::QuoteCall, _, Some(voice)) => voice.status(&handle.id, CallPurpose::Quote).await,
            (TaskKind::BookingCall, _, Some(voice)) => {
                voice.status(&handle.id, CallPurpose::Booking).await
            },
            // A real id whose credentials have since been removed.
            _ => Err(RemoteError::UnknownTask(handle.id.clone())),
        }
    }
}
