//! Contract between the host runtime and per-resource adapters.
//!
//! The host hands adapters opaque JSON state. Adapters map it onto typed
//! models, talk to the API, and use the reconciliation loops for readiness
//! and deletion.

mod kind;
mod rest;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::reconcile::ReconcileError;

pub use kind::{BaseFields, ResourceKind, envelope, require};
pub use rest::{RestAdapter, RestDataSource};

/// Future returned by adapter operations.
pub type AdapterFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ReconcileError>> + Send + 'a>>;

/// Default budget for each lifecycle operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Per-operation time budgets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timeouts {
    /// Budget for create, readiness wait included.
    pub create: Duration,
    /// Budget for update, readiness wait included.
    pub update: Duration,
    /// Budget for the delete retry loop.
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::uniform(DEFAULT_OPERATION_TIMEOUT)
    }
}

impl Timeouts {
    /// Uses the same budget for every operation.
    #[must_use]
    pub const fn uniform(value: Duration) -> Self {
        Self {
            create: value,
            update: value,
            delete: value,
        }
    }
}

/// Ambient context for one lifecycle call.
#[derive(Clone, Debug)]
pub struct OperationContext {
    /// Cancelled by the host when the operation must stop.
    pub cancel: CancellationToken,
    /// Time budgets.
    pub timeouts: Timeouts,
    /// Correlates log events emitted by one call.
    pub operation_id: Uuid,
}

impl OperationContext {
    /// Creates a context with default timeouts.
    #[must_use]
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            timeouts: Timeouts::default(),
            operation_id: Uuid::new_v4(),
        }
    }

    /// Replaces the timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Creates a context whose token is never cancelled.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(CancellationToken::new())
    }
}

/// Result of refreshing a resource.
#[derive(Clone, Debug, PartialEq)]
pub enum ReadOutcome {
    /// The resource exists; carries refreshed state.
    Present(Value),
    /// The API reported 404; the host should drop the resource from state.
    Gone,
}

/// Lifecycle callbacks for one managed resource type.
pub trait ResourceAdapter: Send + Sync {
    /// Registered type name, for example `arubacloud_vpc`.
    fn type_name(&self) -> String;

    /// Creates the resource and waits until it is ready.
    fn create<'a>(&'a self, ctx: &'a OperationContext, planned: Value) -> AdapterFuture<'a, Value>;

    /// Refreshes state from the API.
    fn read<'a>(&'a self, ctx: &'a OperationContext, current: Value)
    -> AdapterFuture<'a, ReadOutcome>;

    /// Applies planned changes and waits until the resource is ready again.
    fn update<'a>(
        &'a self,
        ctx: &'a OperationContext,
        prior: Value,
        planned: Value,
    ) -> AdapterFuture<'a, Value>;

    /// Deletes the resource, retrying while dependents still exist.
    fn delete<'a>(&'a self, ctx: &'a OperationContext, current: Value) -> AdapterFuture<'a, ()>;

    /// Adopts an existing resource by its import identifier.
    fn import<'a>(&'a self, ctx: &'a OperationContext, import_id: &'a str)
    -> AdapterFuture<'a, Value>;
}

/// Read-only lookup of an existing resource.
pub trait DataSource: Send + Sync {
    /// Registered type name, for example `arubacloud_vpc`.
    fn type_name(&self) -> String;

    /// Reads the resource named by `config`.
    fn read<'a>(&'a self, ctx: &'a OperationContext, config: Value) -> AdapterFuture<'a, Value>;
}
