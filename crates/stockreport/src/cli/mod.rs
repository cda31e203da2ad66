pub mod app;
pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use tracing::{error, info};

use crate::config::{self, RuntimePaths};
use crate::utils::time::ReportClock;
use app::{Command, RuntimeArgs};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_RUNTIME_FAILURE: i32 = 1;
pub const EXIT_USAGE_ERROR: i32 = 64;

/// Runs one command and maps the outcome to a process exit code.
///
/// A printed failure envelope still exits with [`EXIT_SUCCESS`]; only a
/// failure to print anything at all is a runtime failure.
pub fn run_command(runtime: &RuntimeArgs, command: &Command) -> i32 {
    let command_name = command.name();
    info!(command = command_name, "starting");

    match execute(runtime, command, ReportClock::system()) {
        Ok(()) => {
            info!(command = command_name, "completed");
            EXIT_SUCCESS
        }
        Err(err) => {
            error!(command = command_name, "failed to write envelope: {err:#}");
            EXIT_RUNTIME_FAILURE
        }
    }
}

pub fn execute(runtime: &RuntimeArgs, command: &Command, clock: ReportClock) -> Result<()> {
    match command {
        Command::Analyze => commands::emit(
            command.name(),
            &commands::analyze::envelope(resolve_runtime_paths(runtime), clock),
        ),
        Command::Backup => commands::emit(
            command.name(),
            &commands::backup::envelope(resolve_runtime_paths(runtime), clock),
        ),
        Command::Report(args) => commands::emit(
            command.name(),
            &commands::report::envelope(&args.mode(), resolve_runtime_paths(runtime), clock),
        ),
        Command::Status => commands::emit(
            command.name(),
            &commands::status::envelope(resolve_runtime_paths(runtime), clock),
        ),
        Command::Schema => commands::emit(command.name(), &commands::schema::envelope()),
    }
}

pub fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

/// Without `--cwd` the data directory sits next to the installed binaries;
/// an explicit `--cwd` also becomes the root holding `data/`.
pub fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = args
        .home_dir
        .clone()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from));

    let (cwd, data_root) = match &args.cwd {
        Some(path) => (path.clone(), path.clone()),
        None => {
            let executable =
                std::env::current_exe().context("failed to locate the running executable")?;
            let cwd = std::env::current_dir().context("failed to read the working directory")?;
            (cwd, config::install_root(&executable)?)
        }
    };

    config::resolve_runtime_paths(
        home_dir.as_deref(),
        &cwd,
        &data_root,
        args.data_dir.as_deref(),
    )
}
