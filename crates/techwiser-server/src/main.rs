//! TechWiser HTTP Server
//!
//! Serves the prompt-to-app REST API.

use anyhow::Result;
use techwiser_server::{api, config::ServerConfig, state};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so its log level can seed the filter
    let config = ServerConfig::load()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!("Loaded configuration: {:?}", config);

    // Initialize application state
    let state = state::init_state(&config)?;
    info!("Application state initialized");

    let app = api::create_router(state);

    // Start server
    let addr = config.bind_address();
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    info!("✓ Server listening on http://{}", addr);
    info!("  Health check: http://{}/health", addr);
    info!("  Generate: POST http://{}/api/generate", addr);
    info!("  Projects: http://{}/api/projects", addr);
    info!("  Models: http://{}/api/models", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(log_level: &str) -> Result<()> {
    let default_filter = format!(
        "techwiser_server={level},techwiser_llm={level},techwiser_repository={level},tower_http=debug",
        level = log_level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
