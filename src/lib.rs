//! Quantum Fraud Detection - Scoring Service
//!
//! Turns a raw transaction description into a fraud decision.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   QFRAUD SCORING SERVICE                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  HTTP (Axum)                                                 │
//! │    GET /  ·  GET /health  ·  POST /predict[/transaction]     │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  validate ─► ScalingTransform ─► ScoringEngine ─► Decision   │
//! │  (features)   (mean / scale)    (variational     (p > 0.5)   │
//! │                                  circuit)                    │
//! │                                                              │
//! │  Artifacts loaded once at startup, shared read-only          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use logic::model::ModelMetadata;
use logic::ScoringPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ScoringPipeline>,
    pub metadata: Option<Arc<ModelMetadata>>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(pipeline: ScoringPipeline, metadata: Option<ModelMetadata>, config: config::Config) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            metadata: metadata.map(Arc::new),
            config,
        }
    }
}

/// Route panic reports through tracing instead of raw stderr.
///
/// Classifier panics are caught per request; this only changes where the
/// report is written.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::error!(
            %location,
            "Panic: {}",
            logic::error::panic_message(info.payload())
        );
    }));
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/predict/transaction", post(handlers::predict::predict_transaction))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
