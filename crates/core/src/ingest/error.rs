use serde_json::Value;
use thiserror::Error;

/// Failure of a single ingestion. Every variant is surfaced to the caller as-is.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("player {0:?} not found; check the spelling and try again")]
    NotFound(String),

    #[error("no game stats available: {0}")]
    NoData(String),

    #[error("stats provider request failed: {0}")]
    Transport(String),

    /// `raw` holds whatever the provider sent, kept for the ingest audit trail.
    #[error("invalid response from stats provider: {detail}")]
    InvalidResponse { detail: String, raw: Option<Value> },

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

impl IngestError {
    pub fn invalid_response(detail: impl Into<String>, raw: Option<Value>) -> Self {
        IngestError::InvalidResponse {
            detail: detail.into(),
            raw,
        }
    }

    /// Provider payload that caused the failure, when one was received.
    pub fn raw_response(&self) -> Option<&Value> {
        match self {
            IngestError::InvalidResponse { raw, .. } => raw.as_ref(),
            _ => None,
        }
    }

    /// Stable code for logs, audit rows and API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Validation(_) => "validation",
            IngestError::NotFound(_) => "not_found",
            IngestError::NoData(_) => "no_data",
            IngestError::Transport(_) => "transport",
            IngestError::InvalidResponse { .. } => "invalid_response",
            IngestError::Storage(_) => "storage",
        }
    }
}
