//! Generic poll-until-terminal loop.

use std::future::Future;
use std::time::Duration;

use repairdesk_core::{DEFAULT_MAX_WAIT_MS, DEFAULT_POLL_INTERVAL_MS, Timings};
use tokio::time::{Instant, sleep};

use crate::client::TaskClient;
use crate::error::RemoteError;
use crate::types::{TaskHandle, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_wait: Duration::from_millis(DEFAULT_MAX_WAIT_MS),
        }
    }
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }

    pub const fn from_timings(timings: &Timings) -> Self {
        Self { interval: timings.poll_interval, max_wait: timings.max_wait }
    }
}

/// Sleeps `interval`, runs `check`, and repeats until `check` yields a value.
///
/// Checks run strictly one after another. Transient errors are logged and
/// the loop continues; any other error ends it. Once `max_wait` has elapsed
/// without a value the loop fails with [`RemoteError::Timeout`]. Nothing on
/// the remote side is cancelled.
pub async fn poll_until<T, F, Fut>(policy: PollPolicy, mut check: F) -> Result<T, RemoteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, RemoteError>>,
{
    let started = Instant::now();
    let mut attempt: u32 = 0;
    loop {
        sleep(policy.interval).await;
        attempt = attempt.saturating_add(1);
        match check().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {},
            Err(e) if e.is_transient() => {
                tracing::warn!(attempt, error = %e, "transient error while polling, will retry");
            },
            Err(e) => return Err(e),
        }
        let waited = started.elapsed();
        if waited >= policy.max_wait {
            return Err(RemoteError::Timeout { waited });
        }
    }
}

/// Polls a single task until it reports a terminal state.
pub async fn poll_until_terminal<C>(
    client: &C,
    handle: &TaskHandle,
    policy: PollPolicy,
) -> Result<TaskStatus, RemoteError>
where
    C: TaskClient + ?Sized,
{
    poll_until(policy, || async move {
        let status = client.get_status(handle).await?;
        Ok(status.is_terminal().then_some(status))
    })
    .await
}
