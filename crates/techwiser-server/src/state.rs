//! Application state initialization
//!
//! Wires repositories, the generator, the model catalogue and the GitHub
//! client from the server configuration.

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::github::GitHubClient;
use anyhow::Result;
use std::sync::Arc;
use techwiser_llm::{AppGenerator, AppGeneratorConfig, ModelCatalog, ProviderRouter};
use techwiser_repository::RepositoryLoader;
use tracing::{info, warn};

/// Build the shared state for the router
pub fn init_state(config: &ServerConfig) -> Result<AppState> {
    let repositories = RepositoryLoader::new(config.repository.clone())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize repositories: {}", e))?;
    info!(source = ?config.repository.source, "repositories initialized");

    if config.gemini_api_key.is_none() {
        warn!("No server Gemini key configured; Gemini requests need a caller-supplied key");
    }

    let router = ProviderRouter::new(config.provider_settings())
        .map_err(|e| anyhow::anyhow!("Failed to initialize provider router: {}", e))?;
    let generator = AppGenerator::new(
        Arc::new(router),
        AppGeneratorConfig::new(config.default_model.clone()),
    );

    let catalog = ModelCatalog::with_base_url(config.llm.openrouter_base_url.clone());

    let github = GitHubClient::new(config.github.clone(), &config.public_url)
        .map_err(|e| anyhow::anyhow!("Failed to initialize GitHub client: {}", e))?;
    if config.github.client_id.is_none() {
        warn!("GitHub client id not configured; GitHub login is disabled");
    }

    Ok(AppState {
        projects: repositories.projects,
        workspaces: repositories.workspaces,
        generator: Arc::new(generator),
        catalog: Arc::new(catalog),
        github: Arc::new(github),
    })
}
