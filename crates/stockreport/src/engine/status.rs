use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sqlite::query_scalar;

const SCHEMA_OBJECTS_SQL: &str = r#"
SELECT name FROM sqlite_master
WHERE type = ?1 AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
ORDER BY name
"#;

/// What the database file looks like from the reporting side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseStatus {
    pub database_path: String,
    pub tables: Vec<String>,
    pub indexes: Vec<String>,
    pub probe: i64,
}

pub fn probe_database(connection: &Connection, database_path: &Path) -> Result<DatabaseStatus> {
    Ok(DatabaseStatus {
        database_path: database_path.display().to_string(),
        tables: schema_objects(connection, "table")?,
        indexes: schema_objects(connection, "index")?,
        probe: query_scalar(connection, "SELECT 1", [], "connection probe")?,
    })
}

fn schema_objects(connection: &Connection, kind: &str) -> Result<Vec<String>> {
    let mut statement = connection
        .prepare(SCHEMA_OBJECTS_SQL)
        .context("failed to prepare schema listing")?;
    statement
        .query_map([kind], |row| row.get::<usize, String>(0))
        .with_context(|| format!("failed to list {kind} objects"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to decode {kind} name"))
}
