//! Quote-call sessions: call several shops, collect quotations, rank them.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use repairdesk_core::{
    CallResult, CallSession, DEFAULT_CALL_LIMIT, MAX_CALL_LIMIT, QuoteAnalysis, SessionStatus,
    Shop, ShopContact, TaskKind,
};
use repairdesk_remote::{
    PollPolicy, QuoteCallRequest, TaskClient, TaskHandle, TaskOutput, TaskPayload, TaskStatus,
    poll_until,
};
use repairdesk_storage::SessionStore;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct StartCallsRequest {
    pub shops: Vec<Shop>,
    pub damage_description: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCallsResult {
    pub session_id: String,
    pub shops_being_called: Vec<ShopContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Client-facing view of a call session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSessionStatus {
    pub session_id: String,
    pub status: SessionStatus,
    pub elapsed_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<CallResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<QuoteAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallSessionStatus {
    pub fn from_session(session: CallSession, now: DateTime<Utc>) -> Self {
        Self {
            elapsed_seconds: session.elapsed_seconds(now),
            session_id: session.session_id,
            status: session.status,
            results: session.results,
            analysis: session.analysis,
            error: session.error,
        }
    }
}

pub struct QuoteCallService {
    client: Arc<dyn TaskClient>,
    store: Arc<dyn SessionStore<CallSession>>,
    policy: PollPolicy,
}

impl QuoteCallService {
    #[must_use]
    pub fn new(
        client: Arc<dyn TaskClient>,
        store: Arc<dyn SessionStore<CallSession>>,
        policy: PollPolicy,
    ) -> Self {
        Self { client, store, policy }
    }

    /// Places one quote call per selected shop and starts monitoring them.
    ///
    /// Shops without a phone number are skipped; at most `limit` shops
    /// (default 3, capped at 5) are called. Calls that cannot be placed are
    /// reported through `error`; if none can be placed the session is stored
    /// as `failed`.
    pub async fn start_quote_calls(
        &self,
        request: StartCallsRequest,
    ) -> Result<StartCallsResult, ServiceError> {
        let damage_description = request.damage_description.trim().to_owned();
        if damage_description.is_empty() {
            return Err(ServiceError::InvalidInput("damage description is required".to_owned()));
        }
        let limit = request.limit.unwrap_or(DEFAULT_CALL_LIMIT).clamp(1, MAX_CALL_LIMIT);
        let targets: Vec<ShopContact> = request
            .shops
            .iter()
            .filter(|shop| shop.has_phone())
            .take(limit)
            .map(ShopContact::from)
            .collect();
        if targets.is_empty() {
            return Err(ServiceError::InvalidInput("no shop with a phone number to call".to_owned()));
        }

        let created = join_all(targets.iter().map(|shop| {
            let payload = TaskPayload::QuoteCall(QuoteCallRequest {
                shop: shop.clone(),
                damage_description: damage_description.clone(),
            });
            async move { self.client.create_task(&payload).await }
        }))
        .await;

        let mut call_ids = Vec::with_capacity(targets.len());
        let mut called = Vec::with_capacity(targets.len());
        let mut failures = Vec::new();
        for (shop, outcome) in targets.into_iter().zip(created) {
            match outcome {
                Ok(handle) => {
                    call_ids.push(handle.id);
                    called.push(shop);
                },
                Err(e) => {
                    tracing::warn!(shop = %shop.name, error = %e, "failed to place quote call");
                    failures.push(format!("{}: {e}", shop.name));
                },
            }
        }
        let error = (!failures.is_empty()).then(|| format!("could not call {}", failures.join("; ")));

        let mut session = CallSession::new(call_ids, called.clone(), damage_description, Utc::now());
        if session.call_ids.is_empty() {
            session.mark_failed(error.clone().unwrap_or_else(|| "no calls placed".to_owned()));
            self.store.persist(&session).await;
            return Ok(StartCallsResult {
                session_id: session.session_id,
                shops_being_called: Vec::new(),
                error,
            });
        }

        self.store.persist(&session).await;
        tracing::info!(
            session = %session.session_id,
            calls = session.call_ids.len(),
            "quote call session started"
        );
        let session_id = session.session_id.clone();
        self.spawn_monitor(session, self.policy);
        Ok(StartCallsResult { session_id, shops_being_called: called, error })
    }

    pub async fn get_session_status(&self, session_id: &str) -> Result<CallSessionStatus, ServiceError> {
        let session = self.store.load(session_id).await.ok_or_else(|| ServiceError::NotFound {
            entity: "call session",
            id: session_id.to_owned(),
        })?;
        Ok(CallSessionStatus::from_session(session, Utc::now()))
    }

    pub async fn all_sessions(&self) -> Vec<CallSession> {
        self.store.load_all().await.into_values().collect()
    }

    /// Fails `calling` sessions older than `stale_after` and resumes
    /// monitoring the rest with whatever wait budget they have left.
    ///
    /// Returns `(failed, resumed)`.
    pub async fn reconcile(&self, stale_after: chrono::Duration) -> (usize, usize) {
        let now = Utc::now();
        let mut failed = 0;
        let mut resumed = 0;
        for mut session in self.all_sessions().await {
            if session.status != SessionStatus::Calling {
                continue;
            }
            let age = now - session.start_time;
            if age > stale_after || session.call_ids.is_empty() {
                session.mark_failed("abandoned: the service restarted while calls were in progress");
                self.store.persist(&session).await;
                failed += 1;
                continue;
            }
            let elapsed = age.to_std().unwrap_or(Duration::ZERO);
            let policy = PollPolicy {
                max_wait: self.policy.max_wait.saturating_sub(elapsed),
                ..self.policy
            };
            tracing::info!(session = %session.session_id, "resuming quote call monitor");
            self.spawn_monitor(session, policy);
            resumed += 1;
        }
        (failed, resumed)
    }

    fn spawn_monitor(&self, session: CallSession, policy: PollPolicy) {
        let client = Arc::clone(&self.client);
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            monitor_session(client, store, session, policy).await;
        });
    }
}

/// Polls every call of `session` until all are terminal, persisting each
/// cycle. Calls that already ended are not polled again. A timeout or
/// permanent error fails the session.
async fn monitor_session(
    client: Arc<dyn TaskClient>,
    store: Arc<dyn SessionStore<CallSession>>,
    session: CallSession,
    policy: PollPolicy,
) {
    let handles: Vec<TaskHandle> =
        session.call_ids.iter().map(|id| TaskHandle::new(TaskKind::QuoteCall, id.clone())).collect();
    let session_id = session.session_id.clone();
    let state = Mutex::new(session);

    let client = client.as_ref();
    let store_ref = store.as_ref();
    let handles = &handles;
    let state_ref = &state;
    let outcome = poll_until(policy, move || async move {
        let previous = state_ref.lock().await.results.clone().unwrap_or_default();
        let settled = |index: usize| previous.get(index).filter(|r| r.state.is_terminal());
        let statuses = join_all(handles.iter().enumerate().map(|(index, handle)| async move {
            match settled(index) {
                Some(_) => None,
                None => Some(client.get_status(handle).await),
            }
        }))
        .await;

        let mut session = state_ref.lock().await;
        let shops = session.shops.clone();
        let mut results = Vec::with_capacity(handles.len());
        for (index, ((handle, shop), status)) in handles.iter().zip(shops).zip(statuses).enumerate() {
            match status {
                None => results.extend(settled(index).cloned()),
                Some(Ok(status)) => results.push(call_result(handle, shop, status)),
                Some(Err(e)) if e.is_transient() => {
                    tracing::warn!(call = %handle.id, error = %e, "transient error checking quote call");
                    let kept = previous.get(index).cloned();
                    results.push(kept.unwrap_or_else(|| CallResult::pending(handle.id.clone(), shop)));
                },
                Some(Err(e)) => return Err(e),
            }
        }

        let completed = session.record_poll_cycle(results);
        store_ref.persist(&session).await;
        Ok(completed.then_some(()))
    })
    .await;

    let mut session = state.into_inner();
    match outcome {
        Ok(()) => {
            let quotes = session.analysis.as_ref().map_or(0, |a| a.ranked.len());
            tracing::info!(session = %session_id, quotes, "quote call session completed");
        },
        Err(e) => {
            tracing::warn!(session = %session_id, error = %e, "quote call session failed");
            let reason = if e.is_timeout() {
                format!("calls did not finish in time: {e}")
            } else {
                e.to_string()
            };
            session.mark_failed(reason);
            store.persist(&session).await;
        },
    }
}

fn call_result(handle: &TaskHandle, shop: ShopContact, status: TaskStatus) -> CallResult {
    let mut result = CallResult::pending(handle.id.clone(), shop);
    result.state = status.state;
    if let Some(TaskOutput::Quote { report, quotation }) = status.output {
        result.quotation = quotation;
        result.transcript = report.transcript;
        result.summary = report.summary;
        result.ended_reason = report.ended_reason;
    }
    result
}
