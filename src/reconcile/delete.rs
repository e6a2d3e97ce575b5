//! Retrying delete loop with linear, capped backoff.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::TransportError;

use super::classify::{Verdict, classify};
use super::error::ReconcileError;
use super::introspect::Introspect;
use super::validation::describe_response;
use super::wait::{ResourceRef, deadline_after};

/// Backoff growth per failed attempt when none is configured.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(5);
/// Upper bound on a single backoff sleep when none is configured.
pub const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(30);

/// Delay schedule between delete attempts: `min(step * n, cap)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BackoffPolicy {
    /// Growth per failed attempt.
    pub step: Duration,
    /// Maximum delay.
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            step: DEFAULT_BACKOFF_STEP,
            cap: DEFAULT_BACKOFF_CAP,
        }
    }
}

impl BackoffPolicy {
    /// Returns the delay after the `attempt`-th failure (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt).min(self.cap)
    }
}

/// Summary of a successful delete.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeleteReport {
    /// Delete calls issued, including the successful one.
    pub attempts: u32,
    /// Whether the API reported the resource as already absent.
    pub gone: bool,
}

/// Drives a delete call to success, retrying transient and dependency
/// failures until the timeout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RetryingDeleter {
    backoff: BackoffPolicy,
}

impl RetryingDeleter {
    /// Creates a deleter with the given backoff.
    #[must_use]
    pub const fn new(backoff: BackoffPolicy) -> Self {
        Self { backoff }
    }

    /// Returns the configured backoff.
    #[must_use]
    pub const fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Calls `remove` until it succeeds or reports 404.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::DeleteTimeout`] when the next backoff would
    /// overrun `timeout` and [`ReconcileError::Cancelled`] when `cancel`
    /// fires during a call or a sleep. A fatal [`TransportError`] is returned
    /// at once as [`ReconcileError::Transport`].
    pub async fn delete<F, Fut, R>(
        &self,
        mut remove: F,
        target: ResourceRef<'_>,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<DeleteReport, ReconcileError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, TransportError>>,
        R: Introspect,
    {
        let started = Instant::now();
        let deadline = deadline_after(started, timeout);
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            debug!(
                resource_type = target.label,
                resource_id = target.id,
                attempt,
                "issuing delete"
            );

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(target.cancelled("delete", started)),
                result = remove() => result,
            };

            let last_error = match outcome {
                Ok(response) => match classify(&response.summary()) {
                    Verdict::Ok => {
                        info!(
                            resource_type = target.label,
                            resource_id = target.id,
                            attempt,
                            "resource deleted"
                        );
                        return Ok(DeleteReport {
                            attempts: attempt,
                            gone: false,
                        });
                    }
                    Verdict::Gone => {
                        info!(
                            resource_type = target.label,
                            resource_id = target.id,
                            attempt,
                            "resource already gone"
                        );
                        return Ok(DeleteReport {
                            attempts: attempt,
                            gone: true,
                        });
                    }
                    verdict => {
                        let message = describe_response(&response);
                        let status = response.summary().status_code;
                        if verdict == Verdict::RetryableDependency {
                            warn!(
                                resource_type = target.label,
                                resource_id = target.id,
                                attempt,
                                status,
                                hint = "dependent resources may still exist",
                                "delete blocked by dependency: {message}"
                            );
                        } else {
                            warn!(
                                resource_type = target.label,
                                resource_id = target.id,
                                attempt,
                                status,
                                "delete failed: {message}"
                            );
                        }
                        if let Some(payload) = response.error_payload() {
                            error!(
                                resource_type = target.label,
                                resource_id = target.id,
                                attempt,
                                status,
                                payload = %payload,
                                "delete error payload"
                            );
                        }
                        message
                    }
                },
                Err(err) if err.is_fatal() => {
                    error!(
                        resource_type = target.label,
                        resource_id = target.id,
                        attempt,
                        error = %err,
                        "delete aborted"
                    );
                    return Err(err.into());
                }
                Err(err) => {
                    warn!(
                        resource_type = target.label,
                        resource_id = target.id,
                        attempt,
                        error = %err,
                        "delete request failed"
                    );
                    err.to_string()
                }
            };

            let delay = self.backoff.delay_for(attempt);
            if Instant::now()
                .checked_add(delay)
                .is_none_or(|resume| resume > deadline)
            {
                return Err(ReconcileError::DeleteTimeout {
                    label: target.label.to_owned(),
                    id: target.id.to_owned(),
                    attempts: attempt,
                    timeout,
                    last_error,
                });
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(target.cancelled("delete", started)),
                () = sleep(delay) => {}
            }
        }
    }
}
