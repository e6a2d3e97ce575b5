//! Provider configuration loading via `ortho-config`.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::api::{ClientSettings, Credentials, DEFAULT_BASE_URL, DEFAULT_TOKEN_URL};

/// Environment variable consulted when `api_key` is not configured.
pub const API_KEY_ENV: &str = "ARUBACLOUD_API_KEY";
/// Environment variable consulted when `api_secret` is not configured.
pub const API_SECRET_ENV: &str = "ARUBACLOUD_API_SECRET";

/// Provider settings merged from defaults, `arubacloud.toml`, and
/// `ARUBACLOUD_*` environment variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "ARUBACLOUD",
    discovery(
        app_name = "arubacloud",
        env_var = "ARUBACLOUD_CONFIG_PATH",
        config_file_name = "arubacloud.toml",
        dotfile_name = ".arubacloud.toml",
        project_file_name = "arubacloud.toml"
    )
)]
pub struct ProviderConfig {
    /// API key issued by the Aruba Cloud console.
    pub api_key: Option<String>,
    /// Secret paired with the API key.
    pub api_secret: Option<String>,
    /// Base URL of the REST API.
    #[ortho_config(default = DEFAULT_BASE_URL.to_owned())]
    pub base_url: String,
    /// Token endpoint of the identity server.
    #[ortho_config(default = DEFAULT_TOKEN_URL.to_owned())]
    pub token_url: String,
    /// Per-request HTTP timeout in seconds.
    #[ortho_config(default = 30)]
    pub http_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            token_url: DEFAULT_TOKEN_URL.to_owned(),
            http_timeout_secs: 30,
        }
    }
}

/// Where a missing credential can be supplied, used to build diagnostics.
struct FieldMetadata {
    attribute: &'static str,
    description: &'static str,
    env_var: &'static str,
}

const API_KEY_FIELD: FieldMetadata = FieldMetadata {
    attribute: "api_key",
    description: "API key",
    env_var: API_KEY_ENV,
};

const API_SECRET_FIELD: FieldMetadata = FieldMetadata {
    attribute: "api_secret",
    description: "API secret",
    env_var: API_SECRET_ENV,
};

impl ProviderConfig {
    /// Loads configuration without attempting to parse CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when merging sources fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("arubacloud")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Resolves the API credentials.
    ///
    /// Explicit, non-blank attributes win; otherwise `env` is consulted for
    /// [`API_KEY_ENV`] and [`API_SECRET_ENV`]. Every missing value is
    /// reported, not just the first.
    ///
    /// # Errors
    ///
    /// Returns [`Diagnostics`] with one error per missing credential.
    pub fn resolve_credentials(
        &self,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Result<Credentials, Diagnostics> {
        let api_key = resolve_field(self.api_key.as_deref(), &API_KEY_FIELD, env);
        let api_secret = resolve_field(self.api_secret.as_deref(), &API_SECRET_FIELD, env);
        match (api_key, api_secret) {
            (Ok(key), Ok(secret)) => Ok(Credentials::new(key, secret)),
            (key, secret) => Err(Diagnostics(
                [key.err(), secret.err()].into_iter().flatten().collect(),
            )),
        }
    }

    /// Builds client settings from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Diagnostics`] when credentials are missing or the HTTP
    /// timeout is zero.
    pub fn client_settings(
        &self,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Result<ClientSettings, Diagnostics> {
        let credentials = self.resolve_credentials(env);
        let timeout_problem = (self.http_timeout_secs == 0).then(|| {
            Diagnostic::error(
                "Invalid HTTP timeout",
                "http_timeout_secs must be greater than zero",
                "http_timeout_secs",
            )
        });
        match (credentials, timeout_problem) {
            (Ok(resolved), None) => Ok(ClientSettings::new(resolved)
                .base_url(self.base_url.clone())
                .token_url(self.token_url.clone())
                .http_timeout(Duration::from_secs(self.http_timeout_secs))),
            (Ok(_), Some(problem)) => Err(Diagnostics(vec![problem])),
            (Err(mut diagnostics), problem) => {
                diagnostics.0.extend(problem);
                Err(diagnostics)
            }
        }
    }
}

fn resolve_field(
    explicit: Option<&str>,
    metadata: &FieldMetadata,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<String, Diagnostic> {
    explicit
        .map(str::to_owned)
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env(metadata.env_var).filter(|value| !value.trim().is_empty()))
        .ok_or_else(|| {
            Diagnostic::error(
                format!("Missing {}", metadata.description),
                format!(
                    "set the {} attribute, the {} environment variable, or {} in arubacloud.toml",
                    metadata.attribute, metadata.env_var, metadata.attribute
                ),
                metadata.attribute,
            )
        })
}

/// Configuration problem that stops the provider, attached to an attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    /// One-line summary.
    pub summary: String,
    /// Remediation guidance.
    pub detail: String,
    /// Path of the offending attribute, for example `["api_key"]`.
    pub attribute_path: Vec<String>,
}

impl Diagnostic {
    /// Creates an error diagnostic on a top-level attribute.
    #[must_use]
    pub fn error(
        summary: impl Into<String>,
        detail: impl Into<String>,
        attribute: &str,
    ) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
            attribute_path: if attribute.is_empty() {
                Vec::new()
            } else {
                vec![attribute.to_owned()]
            },
        }
    }
}

/// Diagnostics produced while configuring the provider.
#[derive(Clone, Debug, Default, Error, Eq, PartialEq)]
#[error("{}", render(.0))]
pub struct Diagnostics(pub Vec<Diagnostic>);

fn render(diagnostics: &[Diagnostic]) -> String {
    let mut text = String::new();
    for (index, diagnostic) in diagnostics.iter().enumerate() {
        if index > 0 {
            text.push('\n');
        }
        text.push_str(&format!(
            "error: {}: {}",
            diagnostic.summary, diagnostic.detail
        ));
        if !diagnostic.attribute_path.is_empty() {
            text.push_str(&format!(" (at {})", diagnostic.attribute_path.join(".")));
        }
    }
    text
}

/// Errors raised while loading configuration sources.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[rstest]
    fn explicit_credentials_win_over_environment() {
        let config = ProviderConfig {
            api_key: Some(String::from("key")),
            api_secret: Some(String::from("secret")),
            ..ProviderConfig::default()
        };
        let credentials = config
            .resolve_credentials(&|_| Some(String::from("from-env")))
            .expect("credentials resolve");
        assert_eq!(credentials, Credentials::new("key", "secret"));
    }

    #[rstest]
    fn blank_values_fall_back_to_environment() {
        let config = ProviderConfig {
            api_key: Some(String::from("  ")),
            ..ProviderConfig::default()
        };
        let credentials = config
            .resolve_credentials(&|name| match name {
                API_KEY_ENV => Some(String::from("env-key")),
                API_SECRET_ENV => Some(String::from("env-secret")),
                _ => None,
            })
            .expect("environment supplies both");
        assert_eq!(credentials, Credentials::new("env-key", "env-secret"));
    }

    #[rstest]
    fn missing_credentials_are_reported_together() {
        let diagnostics = ProviderConfig::default()
            .resolve_credentials(&no_env)
            .expect_err("nothing configured");
        let paths: Vec<Vec<String>> = diagnostics
            .0
            .iter()
            .map(|diagnostic| diagnostic.attribute_path.clone())
            .collect();
        assert_eq!(
            paths,
            vec![vec![String::from("api_key")], vec![String::from("api_secret")]]
        );
        let rendered = diagnostics.to_string();
        assert!(rendered.contains(API_KEY_ENV), "{rendered}");
        assert!(rendered.contains(API_SECRET_ENV), "{rendered}");
    }

    #[rstest]
    fn zero_timeout_is_rejected_alongside_credentials() {
        let config = ProviderConfig {
            http_timeout_secs: 0,
            ..ProviderConfig::default()
        };
        let diagnostics = config.client_settings(&no_env).expect_err("invalid");
        assert_eq!(diagnostics.0.len(), 3);
        assert_eq!(
            diagnostics.0.last().map(|d| d.attribute_path.clone()),
            Some(vec![String::from("http_timeout_secs")])
        );
    }

    #[rstest]
    fn client_settings_carry_configured_endpoints() {
        let config = ProviderConfig {
            api_key: Some(String::from("key")),
            api_secret: Some(String::from("secret")),
            base_url: String::from("http://localhost:1234"),
            http_timeout_secs: 5,
            ..ProviderConfig::default()
        };
        let settings = config.client_settings(&no_env).expect("valid");
        assert_eq!(settings.base_url, "http://localhost:1234");
        assert_eq!(settings.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
    }
}
