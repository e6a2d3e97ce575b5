//! Behavioural smoke tests for the `arubacloud` binary.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command isolated from the caller's credentials and config files.
fn isolated(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("arubacloud");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("ARUBACLOUD_API_KEY")
        .env_remove("ARUBACLOUD_API_SECRET")
        .env_remove("ARUBACLOUD_CONFIG_PATH")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_without_arguments_prints_usage() {
    let home = TempDir::new().expect("tempdir");
    isolated(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn list_types_needs_no_credentials() {
    let home = TempDir::new().expect("tempdir");
    isolated(&home)
        .arg("list-types")
        .assert()
        .success()
        .stdout(predicate::str::contains("arubacloud_vpc"))
        .stdout(predicate::str::contains("arubacloud_kms_key"));
}

#[test]
fn create_without_credentials_names_the_environment_variables() {
    let home = TempDir::new().expect("tempdir");
    isolated(&home)
        .args(["create", "--type", "arubacloud_vpc", "--state", "vpc.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ARUBACLOUD_API_KEY"))
        .stderr(predicate::str::contains("ARUBACLOUD_API_SECRET"));
}

#[test]
fn unknown_types_are_reported() {
    let home = TempDir::new().expect("tempdir");
    isolated(&home)
        .env("ARUBACLOUD_API_KEY", "key")
        .env("ARUBACLOUD_API_SECRET", "secret")
        .args(["import", "--type", "arubacloud_nope", "--id", "p1/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown type \"arubacloud_nope\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn import_reads_settings_from_the_config_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/providers/Aruba.Network/vpcs/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": { "id": "v1", "name": "net", "location": { "value": "ITBG-Bergamo" } },
            "status": { "state": "Active" }
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().expect("tempdir");
    let config_path = home.path().join("provider.toml");
    fs::write(
        &config_path,
        format!(
            "api_key = \"key\"\napi_secret = \"secret\"\nbase_url = \"{uri}\"\ntoken_url = \"{uri}/token\"\n",
            uri = server.uri()
        ),
    )
    .expect("write config");

    isolated(&home)
        .env("ARUBACLOUD_CONFIG_PATH", &config_path)
        .args(["import", "--type", "arubacloud_vpc", "--id", "p1/v1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"v1\""))
        .stdout(predicate::str::contains("\"state\": \"Active\""));
}
