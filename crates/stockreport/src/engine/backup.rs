use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sqlite::{COUNTED_TABLES, count_rows, open_read_only};
use crate::utils::time::ReportClock;

pub const BACKUP_FILE_PREFIX: &str = "backup_";
pub const BACKUP_FILE_EXTENSION: &str = "db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BackupOutcome {
    pub backup_path: String,
    pub table_counts: BTreeMap<String, i64>,
    pub timestamp: String,
}

/// `backup_YYYYMMDD_HHMMSS.db`. Two backups within the same second share a
/// name and the later one overwrites the earlier.
#[must_use]
pub fn backup_file_name(clock: ReportClock) -> String {
    format!(
        "{BACKUP_FILE_PREFIX}{}.{BACKUP_FILE_EXTENSION}",
        clock.backup_stamp()
    )
}

/// Copies `database_path` into `backup_dir` and counts the rows of the
/// source tables afterwards.
pub fn backup_database(
    database_path: &Path,
    backup_dir: &Path,
    clock: ReportClock,
) -> Result<BackupOutcome> {
    std::fs::create_dir_all(backup_dir).with_context(|| {
        format!(
            "failed to create backup directory: {}",
            backup_dir.display()
        )
    })?;

    let backup_path = backup_path_for(backup_dir, clock);
    let bytes = copy_preserving_mtime(database_path, &backup_path)?;
    info!(
        source = %database_path.display(),
        target = %backup_path.display(),
        bytes,
        "database copied"
    );

    let connection = open_read_only(database_path)?;
    let table_counts = table_counts(&connection)?;

    Ok(BackupOutcome {
        backup_path: backup_path.display().to_string(),
        table_counts,
        timestamp: clock.timestamp()?,
    })
}

pub fn table_counts(connection: &Connection) -> Result<BTreeMap<String, i64>> {
    let mut counts = BTreeMap::new();
    for table in COUNTED_TABLES {
        let count = count_rows(connection, table)?;
        debug!(table, count, "counted rows");
        counts.insert((*table).to_string(), count);
    }
    Ok(counts)
}

fn copy_preserving_mtime(source: &Path, target: &Path) -> Result<u64> {
    if !source.is_file() {
        bail!("database file does not exist: {}", source.display());
    }

    let bytes = std::fs::copy(source, target).with_context(|| {
        format!(
            "failed to copy database {} to {}",
            source.display(),
            target.display()
        )
    })?;

    let modified = File::open(source)
        .and_then(|file| file.metadata())
        .and_then(|metadata| metadata.modified())
        .with_context(|| format!("failed to read modification time: {}", source.display()))?;
    // The copy inherits the source permissions and may be read-only.
    File::open(target)
        .and_then(|file| file.set_modified(modified))
        .with_context(|| format!("failed to set modification time: {}", target.display()))?;

    Ok(bytes)
}

#[must_use]
pub fn backup_path_for(backup_dir: &Path, clock: ReportClock) -> PathBuf {
    backup_dir.join(backup_file_name(clock))
}
