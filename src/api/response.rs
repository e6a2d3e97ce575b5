//! Response envelope shared by every Aruba Cloud endpoint.
//!
//! The HTTP layer converts each exchange into either a [`TransportError`] or
//! an [`ApiResponse`]. Downstream code never inspects raw HTTP values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to obtain a usable HTTP response from the remote API.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TransportError {
    /// No HTTP response was received.
    #[error("transport error: {message}")]
    Request {
        /// Description of the connection, timeout, or body failure.
        message: String,
    },
    /// The identity server refused to issue a bearer token.
    ///
    /// Its status code says nothing about the resource, so it never reaches
    /// the [`ApiResponse`] envelope.
    #[error("authentication failed (status {status}): {message}")]
    Unauthorized {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// Response body, or the canonical reason when the body is empty.
        message: String,
    },
}

impl TransportError {
    /// Creates a request failure from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Creates a token rejection.
    #[must_use]
    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            message: message.into(),
        }
    }

    /// Reports whether retrying cannot help.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        let prefix = if value.is_timeout() {
            "request timed out: "
        } else if value.is_connect() {
            "connection failed: "
        } else {
            ""
        };
        Self::new(format!("{prefix}{value}"))
    }
}

/// One `{fieldName, errorMessage}` entry of a validation failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct FieldError {
    /// Offending attribute as named by the API.
    #[serde(rename = "fieldName", default)]
    pub field_name: String,
    /// Reason the attribute was rejected.
    #[serde(rename = "errorMessage", default)]
    pub error_message: String,
}

/// Problem document returned alongside a non-2xx status.
///
/// `title` and `detail` are the standard members; every other member lands in
/// `extensions`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ApiErrorBody {
    /// Short summary of the problem.
    #[serde(default)]
    pub title: Option<String>,
    /// Longer explanation of the problem.
    #[serde(default)]
    pub detail: Option<String>,
    /// Remaining problem members, keyed by their JSON name.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ApiErrorBody {
    /// Builds a body with only a title and detail.
    #[must_use]
    pub fn new(title: Option<String>, detail: Option<String>) -> Self {
        Self {
            title,
            detail,
            extensions: Map::new(),
        }
    }

    /// Returns the validation entries found under `errors`.
    ///
    /// Some endpoints put the array at the top level of the problem document,
    /// others nest it under an `extensions` object; both are accepted. Entries
    /// that do not match the `{fieldName, errorMessage}` shape are skipped.
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        let errors = self.extensions.get("errors").or_else(|| {
            self.extensions
                .get("extensions")
                .and_then(|nested| nested.get("errors"))
        });
        let Some(Value::Array(entries)) = errors else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| serde_json::from_value::<FieldError>(entry.clone()).ok())
            .filter(|entry| !entry.field_name.is_empty() || !entry.error_message.is_empty())
            .collect()
    }
}

/// Response received from the remote API, successful or not.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<T = Value> {
    /// HTTP status code.
    pub status_code: u16,
    /// Decoded body for successful responses that carried one.
    pub body: Option<T>,
    /// Problem document for error responses.
    pub error: Option<ApiErrorBody>,
}

impl<T> ApiResponse<T> {
    /// Builds a successful response.
    #[must_use]
    pub const fn success(status_code: u16, body: Option<T>) -> Self {
        Self {
            status_code,
            body,
            error: None,
        }
    }

    /// Builds an error response.
    #[must_use]
    pub const fn failure(status_code: u16, error: ApiErrorBody) -> Self {
        Self {
            status_code,
            body: None,
            error: Some(error),
        }
    }

    /// Reports whether the status code falls outside the 2xx range.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.status_code < 200 || self.status_code > 299
    }

    /// Reports whether the API answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

/// Location block of a resource's metadata.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct RemoteLocation {
    /// Region identifier such as `ITBG-Bergamo`.
    #[serde(default)]
    pub value: String,
}

/// Metadata block common to every managed resource.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct RemoteMetadata {
    /// Identifier issued on creation.
    #[serde(default)]
    pub id: Option<String>,
    /// User-assigned name.
    #[serde(default)]
    pub name: Option<String>,
    /// Canonical URI used when other resources reference this one.
    #[serde(default)]
    pub uri: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Region the resource lives in.
    #[serde(default)]
    pub location: Option<RemoteLocation>,
}

/// Status block reported by the API.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct RemoteStatus {
    /// Lifecycle state, for example `Creating` or `Active`.
    #[serde(default)]
    pub state: Option<String>,
}

/// Decoded representation of a single managed resource.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RemoteResource {
    /// Identity and naming.
    #[serde(default)]
    pub metadata: RemoteMetadata,
    /// Resource-specific attributes.
    #[serde(default)]
    pub properties: Value,
    /// Lifecycle state.
    #[serde(default)]
    pub status: RemoteStatus,
}

impl RemoteResource {
    /// Returns the reported state, or an empty string when none is reported.
    #[must_use]
    pub fn state(&self) -> &str {
        self.status.state.as_deref().unwrap_or_default()
    }

    /// Looks up a property by JSON pointer (for example `/network/address`).
    #[must_use]
    pub fn property(&self, pointer: &str) -> Option<&Value> {
        self.properties.pointer(pointer)
    }

    /// Looks up a string property by JSON pointer.
    #[must_use]
    pub fn str_property(&self, pointer: &str) -> Option<String> {
        self.property(pointer)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    /// Looks up an unsigned integer property by JSON pointer.
    #[must_use]
    pub fn u32_property(&self, pointer: &str) -> Option<u32> {
        self.property(pointer)
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
    }

    /// Looks up a boolean property by JSON pointer.
    #[must_use]
    pub fn bool_property(&self, pointer: &str) -> Option<bool> {
        self.property(pointer).and_then(Value::as_bool)
    }
}
