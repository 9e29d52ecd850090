mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

fn main() -> Result<()> {
    // Load configuration first (fails fast on a missing GEMINI_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging; RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,tower_http=info",
                env!("CARGO_PKG_NAME").replace('-', "_")
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MuseCareer API v{}", env!("CARGO_PKG_VERSION"));

    // The blocking HTTP client owns its own runtime, so build it before ours starts.
    let gateway = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        &config.gemini_api_base,
    )?;
    info!("Model gateway initialized (model: {})", config.gemini_model);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.gateway_workers.max(1))
        .build()?;
    info!("Blocking worker pool bounded at {}", config.gateway_workers);

    runtime.block_on(serve(config, Arc::new(gateway)))
}

async fn serve(config: Config, gateway: Arc<GeminiClient>) -> Result<()> {
    let cors = cors_layer(&config.allowed_origins)?;
    info!("CORS origins: {}", config.allowed_origins.join(", "));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    let state = AppState { gateway, config };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
