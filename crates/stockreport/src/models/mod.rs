pub mod envelope;
pub mod payload;
pub mod schema;

pub use envelope::{CommandEnvelope, FailureEnvelope, SuccessEnvelope};
pub use payload::{AnalysisPayload, ReportPayload, StatusPayload};
pub use schema::envelope_schemas;
