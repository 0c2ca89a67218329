//! Scoring Error Taxonomy
//!
//! Closed set of failures the scoring pipeline can produce.
//! Lower layers return these; only the request boundary converts them
//! into responses.

use std::any::Any;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// Malformed request: bad JSON, missing field, wrong length, non-numeric value
    #[error("{0}")]
    InvalidInput(String),

    /// Scaling parameters or classifier failed to load / construct
    #[error("startup configuration error: {0}")]
    StartupConfiguration(String),

    /// Classifier raised a fault while evaluating a single request
    #[error("inference failure: {0}")]
    InferenceFailure(String),
}

impl ScoringError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn startup(msg: impl Into<String>) -> Self {
        Self::StartupConfiguration(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::InferenceFailure(msg.into())
    }

    /// Stable tag used in logs and the `x-error-kind` header
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::StartupConfiguration(_) => "startup_configuration",
            Self::InferenceFailure(_) => "inference_failure",
        }
    }
}

pub type ScoringResult<T> = Result<T, ScoringError>;

/// Text carried by a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
