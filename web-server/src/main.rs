//! Cardio Risk Web Server
//!
//! HTTP front-end for the heart-disease risk predictor.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CARDIO RISK WEB                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────────┐  ┌─────────────────┐ │
//! │  │  API      │  │  RiskEngine       │  │  History        │ │
//! │  │  (Axum)   │─▶│  (Arc, read-only) │─▶│  (Mutex, JSONL) │ │
//! │  └───────────┘  └───────────────────┘  └─────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post, delete},
};
use parking_lot::Mutex;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardio_core::{HistoryStore, JsonlHistory, RiskEngine};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging first so configuration warnings are captured (JSON lines in production)
    let production = config::is_production();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "cardio_web=debug,cardio_core=info,tower_http=debug".into()))
        .with(production.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!production).then(tracing_subscriber::fmt::layer))
        .init();

    // Load configuration
    let config = config::Config::from_env().context("invalid configuration")?;

    tracing::info!("Cardio Risk server starting ({})...", config.environment);

    // Load artifacts once; a bad artifact stops the process
    let engine = RiskEngine::load(&config.model_path, &config.columns_path, config.engine.clone())
        .with_context(|| format!(
            "failed to load model artifacts ({}, {})",
            config.model_path.display(),
            config.columns_path.display()
        ))?;

    let info = engine.artifacts().info();
    tracing::info!(
        "Model ready: {} trees, {} columns, threshold {}",
        info.trees,
        info.n_features,
        engine.threshold().value()
    );

    let history = JsonlHistory::new(&config.history_path);
    tracing::info!("History file: {}", history.path().display());
    let history: Box<dyn HistoryStore> = Box::new(history);

    // Build application state
    let state = AppState {
        engine: Arc::new(engine),
        history: Arc::new(Mutex::new(history)),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RiskEngine>,
    pub history: Arc<Mutex<Box<dyn HistoryStore>>>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/status", get(handlers::status::status))
        .route("/api/v1/schema", get(handlers::status::schema))

        // Assessment
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/what-if", post(handlers::predict::what_if_analysis))

        // History
        .route("/api/v1/history", get(handlers::history::list))
        .route("/api/v1/history/:index", delete(handlers::history::delete_one))
        .route("/api/v1/history/delete", post(handlers::history::delete_selected));

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
