use anyhow::Result;
use clap::Args;

use crate::config::RuntimePaths;
use crate::engine::ReportMode;
use crate::models::{CommandEnvelope, ReportPayload};
use crate::utils::time::ReportClock;

pub const FAILURE_MESSAGE: &str = "report generation failed";

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// `monthly`, `inventory` or `customers`; other names yield an empty report.
    #[arg(value_name = "MODE", default_value = "monthly", allow_hyphen_values = true)]
    pub mode: String,
}

impl ReportArgs {
    #[must_use]
    pub fn mode(&self) -> ReportMode {
        ReportMode::from(self.mode.as_str())
    }
}

#[must_use]
pub fn success_message(mode: &ReportMode) -> String {
    format!("{mode} report generated")
}

pub fn collect(
    mode: &ReportMode,
    runtime_paths: &RuntimePaths,
    clock: ReportClock,
) -> Result<ReportPayload> {
    let connection = crate::sqlite::open_read_only(&runtime_paths.database_path)?;
    let report = crate::engine::generate_report(&connection, mode, clock)?;
    Ok(ReportPayload { report })
}

#[must_use]
pub fn envelope(
    mode: &ReportMode,
    runtime_paths: Result<RuntimePaths>,
    clock: ReportClock,
) -> CommandEnvelope<ReportPayload> {
    CommandEnvelope::from_result(
        runtime_paths.and_then(|paths| collect(mode, &paths, clock)),
        success_message(mode),
        FAILURE_MESSAGE,
    )
}
