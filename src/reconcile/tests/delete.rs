//! Tests for the retrying deleter under a paused clock.

use std::future::pending;
use std::time::Duration;

use rstest::rstest;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use super::{DeleteStep, Script};
use crate::api::TransportError;
use crate::reconcile::{
    BackoffPolicy, DeleteReport, ReconcileError, ResourceRef, RetryingDeleter,
};

const TARGET: ResourceRef<'static> = ResourceRef::new("VPC", "vpc-1");

fn dependency_conflict() -> DeleteStep {
    Ok(super::failure(409, "Conflict", "VPC has subnets"))
}

#[rstest]
fn backoff_grows_linearly_then_caps() {
    let policy = BackoffPolicy::default();
    let delays: Vec<u64> = (1..=8).map(|n| policy.delay_for(n).as_secs()).collect();
    assert_eq!(delays, vec![5, 10, 15, 20, 25, 30, 30, 30]);
}

#[rstest]
fn backoff_saturates_instead_of_overflowing() {
    let policy = BackoffPolicy {
        step: Duration::MAX,
        cap: Duration::from_secs(30),
    };
    assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn dependency_failures_retry_until_success() {
    let script = Script::new([
        dependency_conflict(),
        dependency_conflict(),
        dependency_conflict(),
        Ok(super::success()),
    ]);
    let start = Instant::now();

    let report = RetryingDeleter::default()
        .delete(
            || script.next(),
            TARGET,
            Duration::from_secs(600),
            &CancellationToken::new(),
        )
        .await
        .expect("delete eventually succeeds");

    assert_eq!(
        report,
        DeleteReport {
            attempts: 4,
            gone: false,
        }
    );
    assert_eq!(
        script.offsets(start),
        vec![
            Duration::ZERO,
            Duration::from_secs(5),
            Duration::from_secs(15),
            Duration::from_secs(30)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn not_found_on_first_attempt_is_success() {
    let script = Script::new([Ok(super::failure(404, "Not Found", "no such VPC"))]);
    let start = Instant::now();

    let report = RetryingDeleter::default()
        .delete(
            || script.next(),
            TARGET,
            Duration::from_secs(600),
            &CancellationToken::new(),
        )
        .await
        .expect("404 counts as deleted");

    assert_eq!(
        report,
        DeleteReport {
            attempts: 1,
            gone: true,
        }
    );
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn persistent_failure_times_out_after_three_attempts() {
    let script = Script::new([Ok(super::failure(500, "Internal Server Error", "boom"))]);
    let start = Instant::now();

    let err = RetryingDeleter::default()
        .delete(
            || script.next(),
            TARGET,
            Duration::from_secs(20),
            &CancellationToken::new(),
        )
        .await
        .expect_err("never succeeds");

    assert_eq!(script.calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(15));
    assert_eq!(
        err,
        ReconcileError::DeleteTimeout {
            label: String::from("VPC"),
            id: String::from("vpc-1"),
            attempts: 3,
            timeout: Duration::from_secs(20),
            last_error: String::from("API error (status 500): Internal Server Error: boom"),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn transport_errors_are_retried() {
    let script = Script::new([
        Err(TransportError::new("connection refused")),
        Ok(super::success()),
    ]);
    let start = Instant::now();

    let report = RetryingDeleter::default()
        .delete(
            || script.next(),
            TARGET,
            Duration::from_secs(60),
            &CancellationToken::new(),
        )
        .await
        .expect("second attempt succeeds");

    assert_eq!(report.attempts, 2);
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn transport_error_message_is_kept_on_timeout() {
    let script: Script<DeleteStep> = Script::new([Err(TransportError::new("connection refused"))]);

    let err = RetryingDeleter::default()
        .delete(
            || script.next(),
            TARGET,
            Duration::from_secs(1),
            &CancellationToken::new(),
        )
        .await
        .expect_err("budget shorter than first backoff");

    assert!(matches!(
        err,
        ReconcileError::DeleteTimeout { attempts: 1, ref last_error, .. }
            if last_error == "transport error: connection refused"
    ));
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_backoff() {
    let script = Script::new([dependency_conflict()]);
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(7)).await;
        canceller.cancel();
    });

    let err = RetryingDeleter::default()
        .delete(|| script.next(), TARGET, Duration::from_secs(600), &cancel)
        .await
        .expect_err("cancelled");

    assert_eq!(script.calls(), 2);
    assert_eq!(
        err,
        ReconcileError::Cancelled {
            operation: String::from("delete"),
            label: String::from("VPC"),
            id: String::from("vpc-1"),
            elapsed: Duration::from_secs(7),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_a_hung_call() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = RetryingDeleter::new(BackoffPolicy::default())
        .delete(
            pending::<DeleteStep>,
            TARGET,
            Duration::from_secs(600),
            &cancel,
        )
        .await
        .expect_err("already cancelled");

    assert!(matches!(err, ReconcileError::Cancelled { .. }));
}

#[tokio::test(start_paused = true)]
async fn token_rejection_stops_without_retrying() {
    let script: Script<DeleteStep> = Script::new([
        Err(TransportError::unauthorized(404, "Not Found")),
        Ok(super::success()),
    ]);
    let start = Instant::now();

    let err = RetryingDeleter::default()
        .delete(
            || script.next(),
            TARGET,
            Duration::from_secs(600),
            &CancellationToken::new(),
        )
        .await
        .expect_err("credentials rejected");

    assert_eq!(script.calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(
        err,
        ReconcileError::Transport(TransportError::unauthorized(404, "Not Found"))
    );
}

#[tokio::test(start_paused = true)]
async fn unbounded_timeout_does_not_overflow() {
    let script = Script::new([dependency_conflict(), Ok(super::success())]);

    let report = RetryingDeleter::default()
        .delete(
            || script.next(),
            TARGET,
            Duration::MAX,
            &CancellationToken::new(),
        )
        .await
        .expect("second attempt succeeds");

    assert_eq!(report.attempts, 2);
}
