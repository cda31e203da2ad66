use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::report::ReportArgs;

#[derive(Debug, Parser)]
#[command(
    name = "stockreport",
    version,
    about = "JSON reports and backups for the shop inventory database"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RuntimeArgs {
    /// Home directory used to expand `~` in --data-dir (defaults to $HOME).
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    /// Working directory; also replaces the install root as the parent of
    /// `data/`.
    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    /// Directory holding `veritabani.db` (defaults to `data/` beside the
    /// directory of the executable).
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Dashboard metrics, top sellers of the last 30 days and low stock.
    Analyze,
    /// Timestamped copy of the database plus table row counts.
    Backup,
    /// Monthly, inventory or customer report.
    Report(ReportArgs),
    /// Tables and indexes of the database file.
    Status,
    /// JSON Schema of every command envelope.
    Schema,
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Backup => "backup",
            Self::Report(_) => "report",
            Self::Status => "status",
            Self::Schema => "schema",
        }
    }
}

/// Trailing arguments the script executables accept and ignore.
#[derive(Debug, Clone, Default, Args)]
pub struct IgnoredArgs {
    #[arg(value_name = "ARGS", hide = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}

/// `analyze-data`: the analysis snapshot as its own executable.
#[derive(Debug, Parser)]
#[command(name = "analyze-data", version, about = "Print the analysis snapshot")]
pub struct AnalyzeDataCli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(flatten)]
    pub extra: IgnoredArgs,
}

/// `backup-db`: the backup utility as its own executable.
#[derive(Debug, Parser)]
#[command(name = "backup-db", version, about = "Back up the database file")]
pub struct BackupDbCli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(flatten)]
    pub extra: IgnoredArgs,
}

/// `generate-report [MODE]`: the report generator as its own executable.
#[derive(Debug, Parser)]
#[command(name = "generate-report", version, about = "Print a named report")]
pub struct GenerateReportCli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(flatten)]
    pub extra: IgnoredArgs,
}
