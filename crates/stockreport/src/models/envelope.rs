use std::fmt::{Display, Formatter};

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Body printed when a command completes.
///
/// `payload` is flattened, so its fields sit next to `success` and
/// `message` in the printed object.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub message: String,

    #[serde(flatten)]
    pub payload: T,
}

/// Body printed when any step of a command fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum CommandEnvelope<T> {
    Success(SuccessEnvelope<T>),
    Failure(FailureEnvelope),
}

impl<T> CommandEnvelope<T> {
    #[must_use]
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self::Success(SuccessEnvelope {
            success: true,
            message: message.into(),
            payload,
        })
    }

    /// Renders the whole context chain of `error` into the `error` field.
    #[must_use]
    pub fn failure(error: &anyhow::Error, message: impl Into<String>) -> Self {
        Self::Failure(FailureEnvelope {
            success: false,
            error: format!("{error:#}"),
            message: message.into(),
        })
    }

    #[must_use]
    pub fn from_result(
        result: Result<T>,
        success_message: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        match result {
            Ok(payload) => Self::success(success_message, payload),
            Err(error) => Self::failure(&error, failure_message),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success(envelope) => Some(&envelope.payload),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn failure_envelope(&self) -> Option<&FailureEnvelope> {
        match self {
            Self::Success(_) => None,
            Self::Failure(envelope) => Some(envelope),
        }
    }
}

impl<T: Serialize> CommandEnvelope<T> {
    /// Single-line JSON encoding, as printed to stdout.
    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to encode command envelope")
    }
}

impl<T: Serialize> Display for CommandEnvelope<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(encoded) => f.write_str(&encoded),
            Err(_) => f.write_str("command envelope serialization failure"),
        }
    }
}
