#![forbid(unsafe_code)]

use clap::Parser;
use stockreport::cli::app::Cli;
use stockreport::cli::{exit_code_for_parse_error, run_command};

fn main() {
    stockreport::logging::init();
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };

    run_command(&cli.runtime, &cli.command)
}
