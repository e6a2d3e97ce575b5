//! HTTP client for the Aruba Cloud REST API.
//!
//! Every call returns `Result<ApiResponse, TransportError>`: non-2xx answers
//! are data, not errors, so the reconciliation core can classify them. A
//! rejected token exchange is a [`TransportError::Unauthorized`] and never
//! shows up as a resource status.

mod auth;
mod response;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, trace};

pub use auth::Credentials;
use auth::TokenSource;
pub use response::{
    ApiErrorBody, ApiResponse, FieldError, RemoteLocation, RemoteMetadata, RemoteResource,
    RemoteStatus, TransportError,
};

/// Public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.arubacloud.com";
/// Identity server endpoint issuing client-credentials tokens.
pub const DEFAULT_TOKEN_URL: &str =
    "https://login.aruba.it/auth/realms/cmp-new-apikey/protocol/openid-connect/token";
/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`ArubaClient`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientSettings {
    /// Base URL prepended to every resource path.
    pub base_url: String,
    /// Token endpoint used for the client-credentials exchange.
    pub token_url: String,
    /// Resolved API credentials.
    pub credentials: Credentials,
    /// Timeout applied to each HTTP request.
    pub http_timeout: Duration,
}

impl ClientSettings {
    /// Creates settings pointing at the public endpoints.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            token_url: DEFAULT_TOKEN_URL.to_owned(),
            credentials,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = value.into();
        self
    }

    /// Overrides the token URL.
    #[must_use]
    pub fn token_url(mut self, value: impl Into<String>) -> Self {
        self.token_url = value.into();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn http_timeout(mut self, value: Duration) -> Self {
        self.http_timeout = value;
        self
    }
}

/// Shared handle to a configured client.
pub type ClientHandle = Arc<ArubaClient>;

/// Authenticated client shared by every resource adapter.
pub struct ArubaClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenSource,
}

impl std::fmt::Debug for ArubaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArubaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ArubaClient {
    /// Builds a client from settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the underlying HTTP client cannot be
    /// constructed (for example when the TLS backend fails to initialise).
    pub fn new(settings: ClientSettings) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            tokens: TokenSource::new(settings.token_url, settings.credentials),
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was received or the
    /// identity server refused a token.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.send(Method::GET, path, None).await
    }

    /// Issues a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was received or the
    /// identity server refused a token.
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// Issues a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was received or the
    /// identity server refused a token.
    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// Issues a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was received or the
    /// identity server refused a token.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, TransportError> {
        let token = self.tokens.token(&self.http).await?;

        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "sending request");
        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        trace!(status = status.as_u16(), len = bytes.len(), "received response");
        Ok(decode_response(status, &bytes))
    }
}

/// Converts raw HTTP output into the envelope.
///
/// A success body that is not JSON is kept as a string so nothing is lost;
/// an error body that is not a problem document becomes the `detail`.
fn decode_response(status: StatusCode, bytes: &[u8]) -> ApiResponse {
    let status_code = status.as_u16();
    if status.is_success() {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return ApiResponse::success(status_code, None);
        }
        let body = serde_json::from_slice::<Value>(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()));
        return ApiResponse::success(status_code, Some(body));
    }

    let error = serde_json::from_slice::<ApiErrorBody>(bytes).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(bytes).trim().to_owned();
        ApiErrorBody::new(
            status.canonical_reason().map(str::to_owned),
            (!text.is_empty()).then_some(text),
        )
    });
    ApiResponse::failure(status_code, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decode_keeps_empty_success_bodies_empty() {
        let response = decode_response(StatusCode::NO_CONTENT, b"");
        assert_eq!(response, ApiResponse::success(204, None));
        assert!(!response.is_error());
    }

    #[rstest]
    fn decode_parses_problem_documents() {
        let body = br#"{"title":"Conflict","detail":"VPC has subnets","traceId":"abc"}"#;
        let response = decode_response(StatusCode::CONFLICT, body);
        let error = response.error.expect("error body");
        assert_eq!(error.title.as_deref(), Some("Conflict"));
        assert_eq!(error.detail.as_deref(), Some("VPC has subnets"));
        assert_eq!(
            error.extensions.get("traceId"),
            Some(&Value::String(String::from("abc")))
        );
    }

    #[rstest]
    fn decode_falls_back_to_plain_text_errors() {
        let response = decode_response(StatusCode::BAD_GATEWAY, b"upstream exploded");
        let error = response.error.expect("error body");
        assert_eq!(error.title.as_deref(), Some("Bad Gateway"));
        assert_eq!(error.detail.as_deref(), Some("upstream exploded"));
    }

    #[rstest]
    fn field_errors_are_read_from_nested_extensions() {
        let body = br#"{"title":"Bad","extensions":{"errors":[{"fieldName":"name","errorMessage":"required"}]}}"#;
        let response = decode_response(StatusCode::BAD_REQUEST, body);
        let errors = response.error.expect("error body").field_errors();
        assert_eq!(
            errors,
            vec![FieldError {
                field_name: String::from("name"),
                error_message: String::from("required"),
            }]
        );
    }

    #[rstest]
    fn credentials_debug_redacts_secret() {
        let rendered = format!("{:?}", Credentials::new("key", "hunter2"));
        assert!(!rendered.contains("hunter2"), "secret leaked: {rendered}");
    }
}
