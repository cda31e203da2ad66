#![forbid(unsafe_code)]

use clap::Parser;
use stockreport::cli::app::{AnalyzeDataCli, Command};
use stockreport::cli::{exit_code_for_parse_error, run_command};

fn main() {
    stockreport::logging::init();
    let code = match AnalyzeDataCli::try_parse() {
        Ok(cli) => run_command(&cli.runtime, &Command::Analyze),
        Err(error) => exit_code_for_parse_error(error),
    };
    std::process::exit(code);
}
