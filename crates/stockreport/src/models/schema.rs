use serde_json::{Map, Value};

use super::{AnalysisPayload, CommandEnvelope, ReportPayload, StatusPayload};
use crate::engine::BackupOutcome;

/// JSON Schema of every command envelope, keyed by command name.
#[must_use]
pub fn envelope_schemas() -> Value {
    let mut schemas = Map::new();
    schemas.insert(
        "analyze".to_string(),
        schemars::schema_for!(CommandEnvelope<AnalysisPayload>).to_value(),
    );
    schemas.insert(
        "backup".to_string(),
        schemars::schema_for!(CommandEnvelope<BackupOutcome>).to_value(),
    );
    schemas.insert(
        "report".to_string(),
        schemars::schema_for!(CommandEnvelope<ReportPayload>).to_value(),
    );
    schemas.insert(
        "status".to_string(),
        schemars::schema_for!(CommandEnvelope<StatusPayload>).to_value(),
    );
    Value::Object(schemas)
}
