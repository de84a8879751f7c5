mod analysis;
mod config;
mod document;
mod errors;
mod llm_client;
mod routes;
mod schemas;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::connect_llm_model;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-llm API v{}", env!("CARGO_PKG_VERSION"));

    // No request is made here; key problems surface on the first analysis call.
    let llm = connect_llm_model(config.openai_api_key.clone())
        .reconfigure(|defaults| config.apply_model_overrides(defaults));
    info!(
        "LLM client configured (model: {}, temperature: {}, frequency_penalty: {})",
        llm.config().model,
        llm.config().temperature,
        llm.config().frequency_penalty
    );

    let state = AppState { llm: Arc::new(llm) };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
