//! Maps remote outcomes to retry verdicts.

use crate::api::TransportError;

use super::introspect::{ErrorSummary, Introspect};

/// Substrings that mark a failure as waiting on another resource.
///
/// Matched case-insensitively against `"title: detail"`. Plain substring
/// matching over-matches (`attached_at` contains `attached`); a structured
/// error code from the API would replace this list.
pub const DEPENDENCY_KEYWORDS: [&str; 18] = [
    "dependency",
    "dependent",
    "depend",
    "cannot delete",
    "can't delete",
    "still in use",
    "in use",
    "has resources",
    "contains resources",
    "has subnets",
    "has security groups",
    "must be deleted first",
    "delete first",
    "remove first",
    "still exists",
    "associated",
    "attached",
    "linked",
];

/// Outcome category used by the retry loops.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// The call succeeded.
    Ok,
    /// The resource does not exist (404).
    Gone,
    /// Any other failure; worth another attempt.
    Retryable,
    /// A failure caused by a dependent resource that still exists.
    RetryableDependency,
}

impl Verdict {
    /// Reports whether the loop should try again.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable | Self::RetryableDependency)
    }
}

/// Classifies a response summary.
#[must_use]
pub fn classify(summary: &ErrorSummary<'_>) -> Verdict {
    if !summary.is_error {
        return Verdict::Ok;
    }
    if summary.status_code == 404 {
        return Verdict::Gone;
    }
    match summary.message() {
        Some(message) if mentions_dependency(&message) => Verdict::RetryableDependency,
        _ => Verdict::Retryable,
    }
}

/// Classifies the result of a remote call; transport failures are retryable.
///
/// Callers stop on [`TransportError::is_fatal`] before consulting this.
#[must_use]
pub fn classify_outcome<R: Introspect>(outcome: &Result<R, TransportError>) -> Verdict {
    match outcome {
        Ok(response) => classify(&response.summary()),
        Err(_) => Verdict::Retryable,
    }
}

/// Reports whether a message contains any dependency keyword.
#[must_use]
pub fn mentions_dependency(message: &str) -> bool {
    let lowered = message.to_lowercase();
    DEPENDENCY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
