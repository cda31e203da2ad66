#![forbid(unsafe_code)]

use clap::Parser;
use stockreport::cli::app::{Command, GenerateReportCli};
use stockreport::cli::{exit_code_for_parse_error, run_command};

fn main() {
    stockreport::logging::init();
    let code = match GenerateReportCli::try_parse() {
        Ok(cli) => run_command(&cli.runtime, &Command::Report(cli.report)),
        Err(error) => exit_code_for_parse_error(error),
    };
    std::process::exit(code);
}
