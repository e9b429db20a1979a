mod config;
mod errors;
mod experience;
mod extraction;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::experience::estimator::ExperienceEstimator;
use crate::extraction::capabilities;
use crate::llm_client::build_generator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails only on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Experience API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {config:?}");

    // Initialize the model integration (None → heuristic estimator)
    let generator = build_generator(&config);
    let estimator = Arc::new(
        ExperienceEstimator::new(generator, config.llm_max_retries)
            .with_backoff_step(Duration::from_millis(config.llm_backoff_step_ms)),
    );
    info!(
        "Experience estimator ready (model enabled: {}, max retries: {})",
        estimator.model_enabled(),
        estimator.max_retries()
    );

    let formats = capabilities();
    info!(
        "Document readers: pdf={}, docx={}, txt={}",
        formats.pdf, formats.docx, formats.txt
    );

    // Build app state
    let state = AppState {
        estimator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
