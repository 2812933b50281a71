//! Router creation and configuration
//!
//! Creates the Axum router for the REST API endpoints.

use super::handlers::*;
use super::types::AppState;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create REST API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Projects
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:id",
            patch(update_project).delete(delete_project),
        )
        .route("/api/projects/:id/export", get(export_project))
        .route("/api/projects/:id/bundle", get(bundle_project))
        .route("/api/projects/:id/regenerate", post(regenerate))
        // Generation
        .route("/api/generate", post(generate))
        .route("/api/models", get(list_models))
        // GitHub
        .route("/api/github/login", get(github_login))
        .route("/api/github/callback", get(github_callback))
        .route("/api/github/push", post(github_push))
        // Workspaces
        .route(
            "/api/workspaces",
            get(list_workspaces).post(create_workspace),
        )
        .route(
            "/api/workspaces/:id",
            get(get_workspace).delete(delete_workspace),
        )
        .route("/api/workspaces/:id/messages", put(update_workspace_messages))
        .route("/api/workspaces/:id/files", put(update_workspace_files))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
