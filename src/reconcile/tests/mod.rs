//! Unit tests for the reconciliation core.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::{Ready, ready};
use std::time::Duration;

use tokio::time::Instant;

use crate::api::{ApiErrorBody, ApiResponse, TransportError};

mod classify;
mod delete;
mod wait;

fn failure(status: u16, title: &str, detail: &str) -> ApiResponse {
    ApiResponse::failure(
        status,
        ApiErrorBody::new(Some(title.to_owned()), Some(detail.to_owned())),
    )
}

fn success() -> ApiResponse {
    ApiResponse::success(200, None)
}

/// Replays a fixed sequence of outcomes, repeating the last one forever.
struct Script<T> {
    steps: RefCell<VecDeque<T>>,
    calls: Cell<u32>,
    times: RefCell<Vec<Instant>>,
}

impl<T: Clone> Script<T> {
    fn new(steps: impl IntoIterator<Item = T>) -> Self {
        Self {
            steps: RefCell::new(steps.into_iter().collect()),
            calls: Cell::new(0),
            times: RefCell::new(Vec::new()),
        }
    }

    fn next(&self) -> Ready<T> {
        self.calls.set(self.calls.get() + 1);
        self.times.borrow_mut().push(Instant::now());
        let mut steps = self.steps.borrow_mut();
        let step = if steps.len() > 1 {
            steps.pop_front()
        } else {
            steps.front().cloned()
        };
        ready(step.expect("script must not be empty"))
    }

    fn calls(&self) -> u32 {
        self.calls.get()
    }

    /// Offsets of each call from `start`.
    fn offsets(&self, start: Instant) -> Vec<Duration> {
        self.times
            .borrow()
            .iter()
            .map(|at| at.duration_since(start))
            .collect()
    }
}

type DeleteStep = Result<ApiResponse, TransportError>;
type CheckStep = Result<String, TransportError>;
