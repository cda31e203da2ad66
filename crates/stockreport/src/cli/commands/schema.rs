use serde::Serialize;
use serde_json::Value;

use crate::models::CommandEnvelope;

pub const SUCCESS_MESSAGE: &str = "envelope schemas generated";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaPayload {
    pub schemas: Value,
}

#[must_use]
pub fn envelope() -> CommandEnvelope<SchemaPayload> {
    CommandEnvelope::success(
        SUCCESS_MESSAGE,
        SchemaPayload {
            schemas: crate::models::envelope_schemas(),
        },
    )
}
