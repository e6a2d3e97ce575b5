//! Provider configuration through the public API.

use arubacloud_provider::config::{API_KEY_ENV, API_SECRET_ENV};
use arubacloud_provider::{Provider, ProviderConfig};
use rstest::rstest;

fn env_credentials(name: &str) -> Option<String> {
    match name {
        API_KEY_ENV => Some(String::from("env-key")),
        API_SECRET_ENV => Some(String::from("env-secret")),
        _ => None,
    }
}

#[rstest]
fn environment_credentials_configure_the_client() {
    let config = ProviderConfig {
        base_url: String::from("http://127.0.0.1:9/"),
        ..ProviderConfig::default()
    };
    let client = Provider::configure(&config, &env_credentials).expect("configured");
    assert_eq!(client.base_url(), "http://127.0.0.1:9");
}

#[rstest]
fn a_single_missing_secret_is_reported_with_guidance() {
    let config = ProviderConfig {
        api_key: Some(String::from("key")),
        ..ProviderConfig::default()
    };
    let diagnostics = Provider::configure(&config, &|_| None).expect_err("secret missing");

    let [diagnostic] = diagnostics.0.as_slice() else {
        panic!("expected one diagnostic, got {diagnostics:?}");
    };
    assert_eq!(diagnostic.summary, "Missing API secret");
    assert_eq!(diagnostic.attribute_path, vec![String::from("api_secret")]);
    assert!(diagnostic.detail.contains(API_SECRET_ENV), "{}", diagnostic.detail);
    assert!(diagnostic.detail.contains("arubacloud.toml"), "{}", diagnostic.detail);
}

#[rstest]
fn rendered_diagnostics_name_the_attribute() {
    let diagnostics =
        Provider::configure(&ProviderConfig::default(), &|_| None).expect_err("nothing set");
    let rendered = diagnostics.to_string();
    assert!(
        rendered.starts_with("error: Missing API key: set the api_key attribute"),
        "{rendered}"
    );
    assert!(rendered.contains("(at api_secret)"), "{rendered}");
}
