//! Errors surfaced by reconciliation operations.

use std::time::Duration;

use thiserror::Error;

use crate::api::TransportError;

/// Errors raised while reconciling a resource.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ReconcileError {
    /// Raised when no usable HTTP response was obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Raised when a resource looked up by identifier does not exist.
    #[error("{label} {id} not found")]
    NotFound {
        /// Human-readable resource type.
        label: String,
        /// Remote identifier.
        id: String,
    },
    /// Raised when the API rejects a request.
    #[error("{message}")]
    Api {
        /// HTTP status returned by the API.
        status: u16,
        /// Composite message, validation block included.
        message: String,
    },
    /// Raised when a resource does not become ready in time.
    #[error("timed out after {elapsed:?} waiting for {label} {id} to become ready (last state: {last_state:?})")]
    WaitTimeout {
        /// Human-readable resource type.
        label: String,
        /// Remote identifier.
        id: String,
        /// Time spent polling.
        elapsed: Duration,
        /// Last state observed, empty when no check succeeded.
        last_state: String,
    },
    /// Raised when deletion keeps failing until the deadline.
    #[error("failed to delete {label} {id} after {attempts} attempts within {timeout:?}: {last_error}")]
    DeleteTimeout {
        /// Human-readable resource type.
        label: String,
        /// Remote identifier.
        id: String,
        /// Delete calls issued.
        attempts: u32,
        /// Budget that was exhausted.
        timeout: Duration,
        /// Message of the most recent failure.
        last_error: String,
    },
    /// Raised when the ambient context is cancelled.
    #[error("{operation} of {label} {id} cancelled after {elapsed:?}")]
    Cancelled {
        /// Loop that observed the cancellation.
        operation: String,
        /// Human-readable resource type.
        label: String,
        /// Remote identifier.
        id: String,
        /// Time spent before cancellation.
        elapsed: Duration,
    },
    /// Raised when host-supplied state cannot be mapped to a request.
    #[error("invalid {label} state: {message}")]
    InvalidState {
        /// Human-readable resource type.
        label: String,
        /// Description of the problem.
        message: String,
    },
    /// Raised when an import identifier has the wrong shape.
    #[error("invalid {label} import id {import_id:?}, expected {expected}")]
    InvalidImportId {
        /// Human-readable resource type.
        label: String,
        /// Identifier supplied by the user.
        import_id: String,
        /// Expected format.
        expected: String,
    },
    /// Raised when a create response carries no `metadata.id`.
    #[error("API did not return an identifier for the new {label}")]
    MissingIdentifier {
        /// Human-readable resource type.
        label: String,
    },
    /// Raised when a response body cannot be decoded.
    #[error("failed to decode {label} response: {message}")]
    Decode {
        /// Human-readable resource type.
        label: String,
        /// Decoder message.
        message: String,
    },
}
