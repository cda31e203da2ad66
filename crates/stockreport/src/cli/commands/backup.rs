use anyhow::Result;

use crate::config::RuntimePaths;
use crate::engine::BackupOutcome;
use crate::models::CommandEnvelope;
use crate::utils::time::ReportClock;

pub const SUCCESS_MESSAGE: &str = "database backed up successfully";
pub const FAILURE_MESSAGE: &str = "database backup failed";

pub fn collect(runtime_paths: &RuntimePaths, clock: ReportClock) -> Result<BackupOutcome> {
    crate::engine::backup_database(
        &runtime_paths.database_path,
        &runtime_paths.backup_dir,
        clock,
    )
}

#[must_use]
pub fn envelope(
    runtime_paths: Result<RuntimePaths>,
    clock: ReportClock,
) -> CommandEnvelope<BackupOutcome> {
    CommandEnvelope::from_result(
        runtime_paths.and_then(|paths| collect(&paths, clock)),
        SUCCESS_MESSAGE,
        FAILURE_MESSAGE,
    )
}
