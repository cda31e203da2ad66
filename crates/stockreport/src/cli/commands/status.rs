use anyhow::Result;

use crate::config::RuntimePaths;
use crate::models::{CommandEnvelope, StatusPayload};
use crate::utils::time::ReportClock;

pub const SUCCESS_MESSAGE: &str = "database status collected";
pub const FAILURE_MESSAGE: &str = "database status check failed";

pub fn collect(runtime_paths: &RuntimePaths, clock: ReportClock) -> Result<StatusPayload> {
    let connection = crate::sqlite::open_read_only(&runtime_paths.database_path)?;
    let status = crate::engine::probe_database(&connection, &runtime_paths.database_path)?;
    Ok(StatusPayload {
        status,
        timestamp: clock.timestamp()?,
    })
}

#[must_use]
pub fn envelope(
    runtime_paths: Result<RuntimePaths>,
    clock: ReportClock,
) -> CommandEnvelope<StatusPayload> {
    CommandEnvelope::from_result(
        runtime_paths.and_then(|paths| collect(&paths, clock)),
        SUCCESS_MESSAGE,
        FAILURE_MESSAGE,
    )
}
