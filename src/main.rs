//! Binary entry point for the `arubacloud` CLI.
//!
//! Each subcommand runs one adapter lifecycle call against JSON state read
//! from disk and prints the resulting state as JSON.

mod cli;
mod logging;

use std::env;
use std::io::{self, Write};
use std::process;
use std::time::Duration;

use arubacloud_provider::{
    ClientHandle, Diagnostics, OperationContext, Provider, ProviderConfig, ReadOutcome,
    ReconcileError, ResourceAdapter, Timeouts,
};
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use clap::Parser;
use serde_json::{Value, json};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use cli::{Cli, Command, StateArgs};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Diagnostics(#[from] Diagnostics),
    #[error("unknown type {0:?}; run `arubacloud list-types`")]
    UnknownType(String),
    #[error("failed to read {path}: {message}")]
    ReadState { path: String, message: String },
    #[error("{path} is not valid JSON: {message}")]
    ParseState { path: String, message: String },
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("failed to write output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log_level);
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let Cli {
        timeout_secs,
        command,
        ..
    } = cli;
    if matches!(command, Command::ListTypes) {
        return write_json(io::stdout(), &list_types());
    }

    let config =
        ProviderConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let client = Provider::configure(&config, &|name| env::var(name).ok())?;

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());
    let base = OperationContext::new(cancel);
    let ctx = match timeout_secs {
        Some(secs) => base.with_timeouts(Timeouts::uniform(Duration::from_secs(secs))),
        None => base,
    };

    let output = run(&Provider::new(), client, &ctx, command).await?;
    write_json(io::stdout(), &output)
}

async fn run(
    provider: &Provider,
    client: ClientHandle,
    ctx: &OperationContext,
    command: Command,
) -> Result<Value, CliError> {
    match command {
        Command::Create(args) => {
            let adapter = lookup_resource(provider, &args.resource_type, client)?;
            Ok(adapter.create(ctx, read_state(&args.state)?).await?)
        }
        Command::Read(args) if args.data_source => {
            let StateArgs {
                resource_type,
                state,
            } = args.target;
            let source = provider
                .data_source(&resource_type, client)
                .ok_or(CliError::UnknownType(resource_type))?;
            Ok(source.read(ctx, read_state(&state)?).await?)
        }
        Command::Read(args) => {
            let adapter = lookup_resource(provider, &args.target.resource_type, client)?;
            match adapter.read(ctx, read_state(&args.target.state)?).await? {
                ReadOutcome::Present(state) => Ok(state),
                ReadOutcome::Gone => Ok(Value::Null),
            }
        }
        Command::Update(args) => {
            let adapter = lookup_resource(provider, &args.target.resource_type, client)?;
            let prior = read_state(&args.prior)?;
            let planned = read_state(&args.target.state)?;
            Ok(adapter.update(ctx, prior, planned).await?)
        }
        Command::Delete(args) => {
            let adapter = lookup_resource(provider, &args.resource_type, client)?;
            adapter.delete(ctx, read_state(&args.state)?).await?;
            Ok(Value::Null)
        }
        Command::Import(args) => {
            let adapter = lookup_resource(provider, &args.resource_type, client)?;
            Ok(adapter.import(ctx, &args.id).await?)
        }
        Command::ListTypes => Ok(list_types()),
    }
}

fn lookup_resource(
    provider: &Provider,
    type_name: &str,
    client: ClientHandle,
) -> Result<Box<dyn ResourceAdapter>, CliError> {
    provider
        .resource(type_name, client)
        .ok_or_else(|| CliError::UnknownType(type_name.to_owned()))
}

fn list_types() -> Value {
    let resources: Vec<String> = Provider::resources()
        .into_iter()
        .map(|factory| factory.type_name)
        .collect();
    let data_sources: Vec<String> = Provider::data_sources()
        .into_iter()
        .map(|factory| factory.type_name)
        .collect();
    json!({ "resources": resources, "data_sources": data_sources })
}

fn cancel_on_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling operation");
            cancel.cancel();
        }
    });
}

fn read_state(path: &str) -> Result<Value, CliError> {
    let contents = read_to_string_ambient(path).map_err(|message| CliError::ReadState {
        path: path.to_owned(),
        message,
    })?;
    serde_json::from_str(&contents).map_err(|err| CliError::ParseState {
        path: path.to_owned(),
        message: err.to_string(),
    })
}

fn read_to_string_ambient(path: &str) -> Result<String, String> {
    let full = Utf8Path::new(path);
    let (dir_path, file_path) = if full.is_absolute() {
        let parent = full
            .parent()
            .ok_or_else(|| format!("path has no parent directory: {full}"))?;
        let file_name = full
            .file_name()
            .ok_or_else(|| format!("path has no file name: {full}"))?;
        (parent, Utf8Path::new(file_name))
    } else {
        (Utf8Path::new("."), full)
    };

    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    dir.read_to_string(file_path).map_err(|err| err.to_string())
}

fn write_json(mut target: impl Write, value: &Value) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(target, "{rendered}").map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[rstest]
    fn write_error_renders_display() {
        let mut buffer = Vec::new();
        write_error(
            &mut buffer,
            &CliError::UnknownType(String::from("arubacloud_nope")),
        );
        let rendered = String::from_utf8(buffer).expect("utf8");
        assert_eq!(
            rendered,
            "unknown type \"arubacloud_nope\"; run `arubacloud list-types`\n"
        );
    }

    #[rstest]
    fn list_types_names_resources_and_data_sources() {
        let types = list_types();
        let resources = types["resources"].as_array().expect("resources array");
        assert_eq!(resources.len(), 14);
        assert!(resources.contains(&json!("arubacloud_block_storage")));
        assert_eq!(types["resources"], types["data_sources"]);
    }

    #[rstest]
    fn read_state_parses_absolute_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vpc.json");
        fs::write(&path, r#"{"name":"net","project_id":"p1"}"#).expect("write state");

        let state = read_state(path.to_str().expect("utf8 path")).expect("state parses");
        assert_eq!(state["name"], "net");
    }

    #[rstest]
    fn read_state_reports_invalid_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").expect("write state");

        let err = read_state(path.to_str().expect("utf8 path")).expect_err("invalid");
        assert!(matches!(err, CliError::ParseState { .. }), "{err:?}");
    }

    #[rstest]
    fn read_state_reports_missing_files() {
        let err = read_state("/definitely/not/here.json").expect_err("missing");
        assert!(matches!(err, CliError::ReadState { .. }), "{err:?}");
    }

    #[rstest]
    fn write_json_pretty_prints() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &json!({"id": "v1"})).expect("write");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "{\n  \"id\": \"v1\"\n}\n"
        );
    }
}
