//! Command-line interface definitions for the `arubacloud` binary.
//!
//! Shared by the binary and the build script, which renders the man page.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI for the `arubacloud` binary.
#[derive(Debug, Parser)]
#[command(
    name = "arubacloud",
    about = "Reconcile Aruba Cloud resources described by JSON state files",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Log filter used when `RUST_LOG` is unset (for example `info`).
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    pub(crate) log_level: String,
    /// Budget for create, update and delete, in seconds. Defaults to 20 minutes.
    #[arg(long, global = true, value_name = "SECONDS")]
    pub(crate) timeout_secs: Option<u64>,
    /// Lifecycle operation to run.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Lifecycle operations.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Create a resource from planned state and wait until it is ready.
    Create(StateArgs),
    /// Refresh a resource, or look one up with `--data-source`.
    Read(ReadArgs),
    /// Apply planned state to an existing resource.
    Update(UpdateArgs),
    /// Delete a resource, retrying while dependents still exist.
    Delete(StateArgs),
    /// Adopt an existing resource by import identifier.
    Import(ImportArgs),
    /// List registered resource and data source types.
    ListTypes,
}

/// Resource type and state file.
#[derive(Debug, Args)]
pub(crate) struct StateArgs {
    /// Registered type name, for example `arubacloud_vpc`.
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) resource_type: String,
    /// JSON file holding the resource state.
    #[arg(long, value_name = "PATH")]
    pub(crate) state: String,
}

/// Arguments for `arubacloud read`.
#[derive(Debug, Args)]
pub(crate) struct ReadArgs {
    /// Type and state file.
    #[command(flatten)]
    pub(crate) target: StateArgs,
    /// Read through the data source instead of the managed resource.
    #[arg(long)]
    pub(crate) data_source: bool,
}

/// Arguments for `arubacloud update`.
#[derive(Debug, Args)]
pub(crate) struct UpdateArgs {
    /// Type and planned state file.
    #[command(flatten)]
    pub(crate) target: StateArgs,
    /// JSON file holding the prior state.
    #[arg(long, value_name = "PATH")]
    pub(crate) prior: String,
}

/// Arguments for `arubacloud import`.
#[derive(Debug, Args)]
pub(crate) struct ImportArgs {
    /// Registered type name, for example `arubacloud_vpc`.
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) resource_type: String,
    /// Import identifier, for example `<project_id>/<vpc_id>`.
    #[arg(long, value_name = "ID")]
    pub(crate) id: String,
}
