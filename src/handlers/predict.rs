//! Prediction handlers
//!
//! The request boundary: every scoring failure is turned into an
//! `{"error": ...}` payload here.

use std::time::Instant;

use axum::{body::Bytes, extract::State, Json};
use uuid::Uuid;
use validator::Validate;

use crate::logic::model::ScoreResult;
use crate::logic::{ScoringError, ScoringResult};
use crate::models::{describe, PredictResponse, TransactionAssessment, TransactionRequest};
use crate::{AppError, AppResult, AppState};

/// Score an ordered feature array
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<PredictResponse>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id);
    let _enter = span.enter();

    let start = Instant::now();
    let result = state.pipeline.score_payload(&body);
    log_outcome(result.as_ref(), request_id, start);

    result
        .map(|r| Json(PredictResponse::from(r)))
        .map_err(|e| AppError::new(e, state.config.strict_error_status))
}

/// Score a named-field transaction, echoing the interpreted inputs
pub async fn predict_transaction(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<TransactionAssessment>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict_transaction", %request_id);
    let _enter = span.enter();

    let start = Instant::now();
    let result = parse_transaction(&body).and_then(|tx| {
        let scored = state.pipeline.score(&tx.to_features());
        scored.map(|r| (r, tx))
    });
    log_outcome(result.as_ref().map(|(r, _)| r), request_id, start);

    result
        .map(|(r, tx)| Json(TransactionAssessment::new(r, tx)))
        .map_err(|e| AppError::new(e, state.config.strict_error_status))
}

fn parse_transaction(body: &[u8]) -> ScoringResult<TransactionRequest> {
    let tx: TransactionRequest = serde_json::from_slice(body)
        .map_err(|e| ScoringError::invalid_input(format!("invalid transaction: {}", e)))?;

    tx.validate()
        .map_err(|errors| ScoringError::invalid_input(describe(&errors)))?;

    Ok(tx)
}

/// Single log site for every request outcome
fn log_outcome(result: Result<&ScoreResult, &ScoringError>, request_id: Uuid, start: Instant) {
    let latency_us = start.elapsed().as_micros() as u64;
    match result {
        Ok(r) => tracing::info!(
            %request_id,
            label = r.label.as_str(),
            probability = r.probability,
            latency_us,
            "Transaction scored"
        ),
        Err(e) if matches!(e, ScoringError::InvalidInput(_)) => tracing::warn!(
            %request_id,
            kind = e.kind(),
            latency_us,
            "Rejected request: {}",
            e
        ),
        Err(e) => tracing::error!(
            %request_id,
            kind = e.kind(),
            latency_us,
            "Scoring failed: {}",
            e
        ),
    }
}
