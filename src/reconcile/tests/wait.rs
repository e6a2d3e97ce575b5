//! Tests for the readiness poller under a paused clock.

use std::future::pending;
use std::time::Duration;

use rstest::rstest;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use super::{CheckStep, Script};
use crate::api::TransportError;
use crate::reconcile::{ReadinessPoller, ReconcileError, ResourceRef, is_transitional};

const TARGET: ResourceRef<'static> = ResourceRef::new("VPC", "vpc-1");

fn state(value: &str) -> CheckStep {
    Ok(value.to_owned())
}

fn cancel_after(token: &CancellationToken, after: Duration) {
    let canceller = token.clone();
    tokio::spawn(async move {
        sleep(after).await;
        canceller.cancel();
    });
}

#[rstest]
#[case::in_creation("InCreation", true)]
#[case::creating("Creating", true)]
#[case::deleting("Deleting", true)]
#[case::pending("Pending", true)]
#[case::provisioning("Provisioning", true)]
#[case::active("Active", false)]
#[case::in_use("InUse", false)]
#[case::empty("", false)]
#[case::lowercase("creating", false)]
fn transitional_partition(#[case] value: &str, #[case] expected: bool) {
    assert_eq!(is_transitional(value), expected);
}

#[tokio::test(start_paused = true)]
async fn ready_after_third_check_at_fifteen_seconds() {
    let script = Script::new([state("Creating"), state("Creating"), state("Active")]);
    let start = Instant::now();

    let ready = ReadinessPoller::default()
        .wait_until_ready(
            || script.next(),
            TARGET,
            Duration::from_secs(600),
            &CancellationToken::new(),
        )
        .await
        .expect("resource becomes ready");

    assert_eq!(ready, "Active");
    assert_eq!(script.calls(), 3);
    assert_eq!(
        script.offsets(start),
        vec![
            Duration::from_secs(5),
            Duration::from_secs(10),
            Duration::from_secs(15)
        ]
    );
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_secs(15) && elapsed < Duration::from_millis(15_100),
        "unexpected elapsed {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn times_out_with_last_state() {
    let script = Script::new([state("Provisioning")]);
    let start = Instant::now();

    let err = ReadinessPoller::default()
        .wait_until_ready(
            || script.next(),
            TARGET,
            Duration::from_secs(12),
            &CancellationToken::new(),
        )
        .await
        .expect_err("never leaves provisioning");

    assert_eq!(script.calls(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(12));
    assert_eq!(
        err,
        ReconcileError::WaitTimeout {
            label: String::from("VPC"),
            id: String::from("vpc-1"),
            elapsed: Duration::from_secs(12),
            last_state: String::from("Provisioning"),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_fails_without_checking() {
    let script = Script::new([state("Active")]);

    let err = ReadinessPoller::default()
        .wait_until_ready(
            || script.next(),
            TARGET,
            Duration::ZERO,
            &CancellationToken::new(),
        )
        .await
        .expect_err("zero budget");

    assert_eq!(script.calls(), 0);
    assert!(matches!(err, ReconcileError::WaitTimeout { elapsed, .. } if elapsed.is_zero()));
}

#[tokio::test(start_paused = true)]
async fn check_landing_on_deadline_still_runs() {
    let script = Script::new([state("Creating"), state("Running")]);

    let ready = ReadinessPoller::default()
        .wait_until_ready(
            || script.next(),
            TARGET,
            Duration::from_secs(10),
            &CancellationToken::new(),
        )
        .await
        .expect("second check lands on the deadline");

    assert_eq!(ready, "Running");
    assert_eq!(script.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn check_errors_keep_polling() {
    let script = Script::new([
        Err(TransportError::new("connection reset")),
        state("Active"),
    ]);
    let start = Instant::now();

    let ready = ReadinessPoller::new(Duration::from_secs(2))
        .wait_until_ready(
            || script.next(),
            TARGET,
            Duration::from_secs(60),
            &CancellationToken::new(),
        )
        .await
        .expect("error is transient");

    assert_eq!(ready, "Active");
    assert_eq!(start.elapsed(), Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn empty_state_counts_as_ready() {
    let script = Script::new([state("")]);

    let ready = ReadinessPoller::default()
        .wait_until_ready(
            || script.next(),
            TARGET,
            Duration::from_secs(60),
            &CancellationToken::new(),
        )
        .await
        .expect("stateless resources are ready");

    assert_eq!(ready, "");
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_sleep_is_distinct_from_timeout() {
    let script = Script::new([state("Creating")]);
    let cancel = CancellationToken::new();
    cancel_after(&cancel, Duration::from_secs(7));

    let err = ReadinessPoller::default()
        .wait_until_ready(|| script.next(), TARGET, Duration::from_secs(600), &cancel)
        .await
        .expect_err("cancelled");

    assert_eq!(script.calls(), 1);
    assert_eq!(
        err,
        ReconcileError::Cancelled {
            operation: String::from("wait"),
            label: String::from("VPC"),
            id: String::from("vpc-1"),
            elapsed: Duration::from_secs(7),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_a_hung_check() {
    let cancel = CancellationToken::new();
    cancel_after(&cancel, Duration::from_secs(7));

    let err = ReadinessPoller::default()
        .wait_until_ready(
            pending::<CheckStep>,
            TARGET,
            Duration::from_secs(600),
            &cancel,
        )
        .await
        .expect_err("cancelled while checking");

    assert!(
        matches!(err, ReconcileError::Cancelled { elapsed, .. } if elapsed == Duration::from_secs(7))
    );
}

#[tokio::test(start_paused = true)]
async fn unbounded_timeout_does_not_overflow() {
    let script = Script::new([state("Creating"), state("Active")]);
    let start = Instant::now();

    let ready = ReadinessPoller::new(Duration::from_secs(5))
        .wait_until_ready(
            || script.next(),
            TARGET,
            Duration::MAX,
            &CancellationToken::new(),
        )
        .await
        .expect("ready on the second check");

    assert_eq!(ready, "Active");
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn unbounded_interval_times_out_at_the_deadline() {
    let script = Script::new([state("Creating")]);
    let start = Instant::now();

    let err = ReadinessPoller::new(Duration::MAX)
        .wait_until_ready(
            || script.next(),
            TARGET,
            Duration::from_secs(30),
            &CancellationToken::new(),
        )
        .await
        .expect_err("first tick is past the deadline");

    assert_eq!(script.calls(), 0);
    assert_eq!(start.elapsed(), Duration::from_secs(30));
    assert!(matches!(err, ReconcileError::WaitTimeout { .. }));
}
