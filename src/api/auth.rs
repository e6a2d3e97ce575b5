//! OAuth2 client-credentials token exchange for the Aruba Cloud API.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::response::TransportError;

/// Tokens are refreshed this long before the server-side expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);
/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_LIFETIME_SECS: u64 = 300;
/// Upper bound on a server-reported lifetime.
const MAX_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// API key and secret used to obtain bearer tokens.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    /// Client identifier issued by the Aruba Cloud console.
    pub api_key: String,
    /// Client secret paired with the key.
    pub api_secret: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Fetches and caches bearer tokens.
pub(super) struct TokenSource {
    token_url: String,
    credentials: Credentials,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub(super) fn new(token_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            token_url: token_url.into(),
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Returns a cached token or exchanges the credentials for a fresh one.
    ///
    /// A non-2xx answer from the identity server is
    /// [`TransportError::Unauthorized`], whatever its status.
    pub(super) async fn token(&self, http: &reqwest::Client) -> Result<String, TransportError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.value.clone());
        }

        debug!(token_url = %self.token_url, "requesting access token");
        let response = http
            .post(&self.token_url)
            .form(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &self.credentials.api_key,
                client_secret: &self.credentials.api_secret,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let detail = String::from_utf8_lossy(&body).trim().to_owned();
            let message = if detail.is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_owned()
            } else {
                detail
            };
            return Err(TransportError::unauthorized(status.as_u16(), message));
        }

        let parsed: TokenResponse = serde_json::from_slice(&body)
            .map_err(|err| TransportError::new(format!("invalid token response: {err}")))?;
        let lifetime = Duration::from_secs(
            parsed
                .expires_in
                .unwrap_or(DEFAULT_LIFETIME_SECS)
                .min(MAX_LIFETIME_SECS),
        );
        let refresh_at = Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: parsed.access_token.clone(),
            refresh_at,
        });
        Ok(parsed.access_token)
    }
}
