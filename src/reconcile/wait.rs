//! Readiness polling for asynchronously provisioned resources.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::ReconcileError;

/// Interval between state checks when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// States the remote API reports while work is still in progress.
pub const TRANSITIONAL_STATES: [&str; 5] =
    ["InCreation", "Creating", "Deleting", "Pending", "Provisioning"];

/// Budgets beyond this are treated as unbounded.
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// Instant `timeout` after `start`, clamped so it never overflows.
pub(super) fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout.min(FAR_FUTURE))
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

/// Reports whether `state` is transitional. Matching is case-sensitive.
#[must_use]
pub fn is_transitional(state: &str) -> bool {
    TRANSITIONAL_STATES.contains(&state)
}

/// Resource a loop is working on, used for logs and errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResourceRef<'a> {
    /// Human-readable type label, for example `VPC`.
    pub label: &'a str,
    /// Remote identifier.
    pub id: &'a str,
}

impl<'a> ResourceRef<'a> {
    /// Creates a reference.
    #[must_use]
    pub const fn new(label: &'a str, id: &'a str) -> Self {
        Self { label, id }
    }

    pub(super) fn cancelled(self, operation: &str, started: Instant) -> ReconcileError {
        ReconcileError::Cancelled {
            operation: operation.to_owned(),
            label: self.label.to_owned(),
            id: self.id.to_owned(),
            elapsed: started.elapsed(),
        }
    }
}

/// Polls a state-check closure until the state leaves the transitional set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReadinessPoller {
    interval: Duration,
}

impl Default for ReadinessPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl ReadinessPoller {
    /// Creates a poller with the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Returns the configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until `check` reports a non-transitional state and returns it.
    ///
    /// The first check happens one interval after entry. Check failures are
    /// logged and polling continues. A zero `timeout` fails immediately
    /// without calling `check`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::WaitTimeout`] once the deadline passes and
    /// [`ReconcileError::Cancelled`] when `cancel` fires first.
    pub async fn wait_until_ready<F, Fut, E>(
        &self,
        mut check: F,
        target: ResourceRef<'_>,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, ReconcileError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: Display,
    {
        let started = Instant::now();
        let deadline = deadline_after(started, timeout);
        let mut last_state = String::new();

        loop {
            let due = Instant::now()
                .checked_add(self.interval)
                .filter(|tick| !timeout.is_zero() && *tick <= deadline);
            let Some(next_tick) = due else {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(target.cancelled("wait", started)),
                    () = sleep_until(deadline) => {}
                }
                return Err(ReconcileError::WaitTimeout {
                    label: target.label.to_owned(),
                    id: target.id.to_owned(),
                    elapsed: started.elapsed(),
                    last_state,
                });
            };

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(target.cancelled("wait", started)),
                () = sleep_until(next_tick) => {}
            }

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(target.cancelled("wait", started)),
                result = check() => result,
            };

            match outcome {
                Ok(state) if is_transitional(&state) => {
                    debug!(
                        resource_type = target.label,
                        resource_id = target.id,
                        state = %state,
                        "resource still provisioning"
                    );
                    last_state = state;
                }
                Ok(state) => {
                    info!(
                        resource_type = target.label,
                        resource_id = target.id,
                        state = %state,
                        elapsed_ms = started.elapsed().as_millis(),
                        "resource ready"
                    );
                    return Ok(state);
                }
                Err(err) => {
                    warn!(
                        resource_type = target.label,
                        resource_id = target.id,
                        error = %err,
                        "state check failed, will retry"
                    );
                }
            }
        }
    }
}
