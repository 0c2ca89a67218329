//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::logic::features::LayoutInfo;
use crate::logic::model::{EngineStatus, ModelMetadata};
use crate::AppState;

/// Plain-text liveness acknowledgment
pub async fn root() -> &'static str {
    "Quantum Fraud Detection API is running"
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    engine: EngineStatus,
    model: Option<ModelMetadata>,
    feature_layout: LayoutInfo,
}

/// 503 with `"unhealthy"` once the scoring engine has latched a fault
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let engine = state.pipeline.engine_status();
    let (code, status) = if engine.faulted {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else {
        (StatusCode::OK, "healthy")
    };

    let body = Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        engine,
        model: state.metadata.as_deref().cloned(),
        feature_layout: LayoutInfo::current(),
    });

    (code, body)
}
