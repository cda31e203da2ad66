pub mod analyze;
pub mod backup;
pub mod report;
pub mod schema;
pub mod status;

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::models::CommandEnvelope;

/// Prints `envelope` as the single stdout line of the process.
pub fn emit<T: Serialize>(command: &str, envelope: &CommandEnvelope<T>) -> Result<()> {
    if let Some(failure) = envelope.failure_envelope() {
        warn!(command, error = %failure.error, "{}", failure.message);
    }

    let line = envelope.to_json_line()?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}").context("failed to write envelope to stdout")?;
    stdout.flush().context("failed to flush stdout")
}
