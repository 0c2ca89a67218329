//! Error handling
//!
//! Maps `ScoringError` to the `{"error": "<message>"}` payload.
//! Logging happens at the handler, which knows the request id.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::logic::ScoringError;

pub type AppResult<T> = Result<T, AppError>;

/// Header carrying the error kind tag
pub const ERROR_KIND_HEADER: &str = "x-error-kind";

#[derive(Debug)]
pub struct AppError {
    error: ScoringError,
    strict_status: bool,
}

impl AppError {
    pub fn new(error: ScoringError, strict_status: bool) -> Self {
        Self { error, strict_status }
    }

    /// 200 unless strict statuses are enabled
    pub fn status(&self) -> StatusCode {
        if !self.strict_status {
            return StatusCode::OK;
        }

        match self.error {
            ScoringError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ScoringError::InferenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ScoringError::StartupConfiguration(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.error.to_string() }));

        let mut response = (status, body).into_response();
        response
            .headers_mut()
            .insert(ERROR_KIND_HEADER, HeaderValue::from_static(self.error.kind()));
        response
    }
}
