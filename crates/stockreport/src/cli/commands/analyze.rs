use anyhow::Result;

use crate::config::RuntimePaths;
use crate::models::{AnalysisPayload, CommandEnvelope};
use crate::utils::time::ReportClock;

pub const SUCCESS_MESSAGE: &str = "data analysis completed";
pub const FAILURE_MESSAGE: &str = "data analysis failed";

pub fn collect(runtime_paths: &RuntimePaths, clock: ReportClock) -> Result<AnalysisPayload> {
    let connection = crate::sqlite::open_read_only(&runtime_paths.database_path)?;
    let analysis = crate::engine::analyze(&connection, clock)?;
    Ok(AnalysisPayload {
        analysis,
        timestamp: clock.timestamp()?,
    })
}

#[must_use]
pub fn envelope(
    runtime_paths: Result<RuntimePaths>,
    clock: ReportClock,
) -> CommandEnvelope<AnalysisPayload> {
    CommandEnvelope::from_result(
        runtime_paths.and_then(|paths| collect(&paths, clock)),
        SUCCESS_MESSAGE,
        FAILURE_MESSAGE,
    )
}
