//! Quantum Fraud Detection Scoring Server
//!
//! Loads the scaler and classifier artifacts, then serves the scoring API.
//! Any artifact failure stops the process before the listener is bound.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qfraud_scoring::config::Config;
use qfraud_scoring::logic::features::layout_hash;
use qfraud_scoring::logic::model::{
    load_artifacts, Classifier, DecisionPolicy, SerializedClassifier,
};
use qfraud_scoring::logic::ScoringPipeline;
use qfraud_scoring::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qfraud_scoring=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
    qfraud_scoring::install_panic_hook();

    tracing::info!("Quantum fraud scoring server starting...");
    tracing::info!(
        environment = %config.environment,
        strict_error_status = config.strict_error_status,
        serialize_scoring = config.serialize_scoring,
        "Configuration loaded"
    );

    // Load artifacts
    let artifacts = load_artifacts(&config.scaler_path, &config.model_path)
        .context("failed to load scoring artifacts")?;

    let classifier: Arc<dyn Classifier> = if config.serialize_scoring {
        Arc::new(SerializedClassifier::new(artifacts.classifier))
    } else {
        Arc::new(artifacts.classifier)
    };

    let pipeline = ScoringPipeline::new(artifacts.scaling, classifier, DecisionPolicy::default())
        .context("failed to construct scoring engine")?;

    tracing::info!(
        feature_layout_hash = %format!("{:08x}", layout_hash()),
        threshold = pipeline.policy().threshold(),
        "Scoring pipeline ready"
    );

    // Build application state
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    let state = AppState::new(pipeline, Some(artifacts.metadata), config);

    // Build router
    let app = create_router(state);

    // Start server
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
