use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::{AnalysisSnapshot, DatabaseStatus, Report};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisPayload {
    pub analysis: AnalysisSnapshot,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportPayload {
    pub report: Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusPayload {
    pub status: DatabaseStatus,
    pub timestamp: String,
}
