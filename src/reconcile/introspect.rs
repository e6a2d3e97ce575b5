//! Uniform view over remote outcomes for the classifier.

use crate::api::{ApiResponse, FieldError};

/// The `(status, title, detail, is_error)` view of a response.
///
/// Borrows from the response it summarises.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ErrorSummary<'a> {
    /// HTTP status code, `0` when nothing was observed.
    pub status_code: u16,
    /// Problem title, when the response carried one.
    pub title: Option<&'a str>,
    /// Problem detail, when the response carried one.
    pub detail: Option<&'a str>,
    /// Whether the status falls outside the 2xx range.
    pub is_error: bool,
}

impl ErrorSummary<'static> {
    /// Summary of a value that carries no response at all.
    pub const EMPTY: Self = Self {
        status_code: 0,
        title: None,
        detail: None,
        is_error: false,
    };
}

impl ErrorSummary<'_> {
    /// Joins the non-empty title and detail with `": "`.
    ///
    /// Returns `None` when neither part has content.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let parts: Vec<&str> = [self.title, self.detail]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(": "))
    }
}

/// Anything the classifier can look into.
pub trait Introspect {
    /// Returns the four-tuple summary.
    fn summary(&self) -> ErrorSummary<'_>;

    /// Returns validation entries carried by the response.
    fn field_errors(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Returns the raw problem document for structured error logging.
    fn error_payload(&self) -> Option<String> {
        None
    }
}

impl<T> Introspect for ApiResponse<T> {
    fn summary(&self) -> ErrorSummary<'_> {
        let error = self.error.as_ref();
        ErrorSummary {
            status_code: self.status_code,
            title: error.and_then(|body| body.title.as_deref()),
            detail: error.and_then(|body| body.detail.as_deref()),
            is_error: self.is_error(),
        }
    }

    fn field_errors(&self) -> Vec<FieldError> {
        self.error
            .as_ref()
            .map(crate::api::ApiErrorBody::field_errors)
            .unwrap_or_default()
    }

    fn error_payload(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(|body| serde_json::to_string(body).ok())
    }
}

impl<R: Introspect> Introspect for Option<R> {
    fn summary(&self) -> ErrorSummary<'_> {
        self.as_ref().map_or(ErrorSummary::EMPTY, Introspect::summary)
    }

    fn field_errors(&self) -> Vec<FieldError> {
        self.as_ref().map(Introspect::field_errors).unwrap_or_default()
    }

    fn error_payload(&self) -> Option<String> {
        self.as_ref().and_then(Introspect::error_payload)
    }
}
