//! Resource reconciliation core.
//!
//! Adapters issue mutating calls through the API client and hand closures to
//! the loops here: [`ReadinessPoller`] after create and update,
//! [`RetryingDeleter`] for delete. Both consult the classifier, which reads
//! responses through [`Introspect`].

mod classify;
mod delete;
mod error;
mod introspect;
mod validation;
mod wait;

pub use classify::{DEPENDENCY_KEYWORDS, Verdict, classify, classify_outcome, mentions_dependency};
pub use delete::{
    BackoffPolicy, DEFAULT_BACKOFF_CAP, DEFAULT_BACKOFF_STEP, DeleteReport, RetryingDeleter,
};
pub use error::ReconcileError;
pub use introspect::{ErrorSummary, Introspect};
pub use validation::{describe_response, validation_block};
pub use wait::{
    DEFAULT_POLL_INTERVAL, ReadinessPoller, ResourceRef, TRANSITIONAL_STATES, is_transitional,
};

/// Poller and deleter bundled for adapters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reconciler {
    /// Loop used after create and update.
    pub poller: ReadinessPoller,
    /// Loop used for delete.
    pub deleter: RetryingDeleter,
}

impl Reconciler {
    /// Creates a reconciler from its two loops.
    #[must_use]
    pub const fn new(poller: ReadinessPoller, deleter: RetryingDeleter) -> Self {
        Self { poller, deleter }
    }
}

#[cfg(test)]
mod tests;
