//! Resource reconciliation core for the Aruba Cloud provider.
//!
//! Resource adapters translate host state into REST calls. The
//! [`reconcile`] module supplies the pieces they share: error
//! classification, response introspection, readiness polling and
//! dependency-aware deletion. [`provider`] registers the adapters and
//! builds the authenticated client from [`config`].

pub mod adapter;
pub mod api;
pub mod config;
pub mod provider;
pub mod reconcile;
pub mod resources;

pub use adapter::{
    DataSource, OperationContext, ReadOutcome, ResourceAdapter, ResourceKind, Timeouts,
};
pub use api::{ArubaClient, ClientHandle, ClientSettings, Credentials};
pub use config::{ConfigError, Diagnostic, Diagnostics, ProviderConfig};
pub use provider::{PROVIDER_PREFIX, Provider};
pub use reconcile::{
    DeleteReport, ReadinessPoller, ReconcileError, Reconciler, RetryingDeleter, Verdict, classify,
};
