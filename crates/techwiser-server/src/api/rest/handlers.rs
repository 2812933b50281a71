//! API endpoint handlers
//!
//! HTTP request handlers for all REST API endpoints.

use super::extractors::JsonExtractor;
use super::types::*;
use crate::error::ServerError;
use crate::generation::{generate_project, regenerate_project, GenerationRequest};
use crate::github::{random_state, NewRepository, PushSummary};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use techwiser_core::export::{bundle_text, zip_bytes, zip_file_name};
use techwiser_llm::gemini_models;
use techwiser_repository::{DeleteOutcome, NewProject, Project, ProjectPatch, Workspace};
use tracing::{info, warn};

/// Health check endpoint
pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ===== Projects =====

pub(super) async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, ServerError> {
    let projects = state
        .projects
        .list()
        .await
        .map_err(ServerError::storage("Failed to fetch projects"))?;
    Ok(Json(projects))
}

pub(super) async fn create_project(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<NewProject>,
) -> Result<Json<Project>, ServerError> {
    let project = state
        .projects
        .create(payload)
        .await
        .map_err(ServerError::storage("Failed to create project"))?;

    info!(project = %project.id, "project created");
    Ok(Json(project))
}

pub(super) async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonExtractor(patch): JsonExtractor<ProjectPatch>,
) -> Result<Json<Project>, ServerError> {
    match state.projects.update(&id, patch).await {
        Ok(project) => Ok(Json(project)),
        Err(e) if e.is_not_found() => Err(ServerError::NotFound("Project not found".to_string())),
        Err(e) => Err(ServerError::storage("Failed to update project")(e)),
    }
}

pub(super) async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ServerError> {
    state
        .projects
        .delete(&id)
        .await
        .map_err(ServerError::storage("Failed to delete project"))?;

    info!(project = %id, "project deleted");
    Ok(Json(SuccessResponse { success: true }))
}

async fn find_project(state: &AppState, id: &str) -> Result<Project, ServerError> {
    state
        .projects
        .get(id)
        .await
        .map_err(ServerError::storage("Failed to fetch projects"))?
        .ok_or_else(|| ServerError::NotFound("Project not found".to_string()))
}

/// ZIP download of a project's files
pub(super) async fn export_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let project = find_project(&state, &id).await?;
    let archive = zip_bytes(&project.files)?;
    let file_name = zip_file_name(Utc::now());

    info!(project = %id, bytes = archive.len(), "project exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        archive,
    )
        .into_response())
}

/// All files as one text blob
pub(super) async fn bundle_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let project = find_project(&state, &id).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        bundle_text(&project.files),
    )
        .into_response())
}

// ===== Generation =====

#[axum::debug_handler]
pub(super) async fn generate(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<GeneratePayload>,
) -> Result<Json<Project>, ServerError> {
    let options = payload.options();

    info!(
        model = %state.generator.model_for(&options),
        project = payload.project_id.as_deref().unwrap_or("new"),
        "received generation request"
    );

    let request = GenerationRequest {
        prompt: payload.prompt,
        language: payload.language,
        project_id: payload.project_id,
        options,
    };

    let project = generate_project(state.projects.as_ref(), &state.generator, request).await?;
    Ok(Json(project))
}

pub(super) async fn regenerate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Project>, ServerError> {
    let payload: RegeneratePayload = if body.iter().all(u8::is_ascii_whitespace) {
        RegeneratePayload::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ServerError::InvalidRequest(format!("Invalid JSON data: {}", e)))?
    };

    let project =
        regenerate_project(state.projects.as_ref(), &state.generator, &id, &payload.options())
            .await?;
    Ok(Json(project))
}

pub(super) async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        gemini: gemini_models(),
        openrouter: state.catalog.openrouter_models().await,
    })
}

// ===== GitHub =====

pub(super) async fn github_login(State(state): State<AppState>) -> Result<Redirect, ServerError> {
    let url = state.github.authorize_url(&random_state())?;
    Ok(Redirect::temporary(&url))
}

pub(super) async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let target = state
        .github
        .callback_redirect(query.code.as_deref(), query.error.as_deref())
        .await;
    Redirect::temporary(&target)
}

pub(super) async fn github_push(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<PushPayload>,
) -> Result<Json<PushSummary>, ServerError> {
    if payload.token.trim().is_empty() {
        return Err(ServerError::Unauthorized("GitHub token is required".to_string()));
    }
    if payload.repo_name.trim().is_empty() {
        return Err(ServerError::InvalidRequest("Repository name is required".to_string()));
    }

    let project = find_project(&state, &payload.project_id).await?;
    if project.files.is_empty() {
        return Err(ServerError::InvalidRequest("Project has no files to push".to_string()));
    }

    let repo = NewRepository {
        name: payload.repo_name.trim().to_string(),
        description: payload.description,
        private: payload.private,
    };

    let summary = state
        .github
        .push(&payload.token, &repo, &project.files)
        .await
        .map_err(|e| {
            warn!(repo = %repo.name, "GitHub push failed: {}", e);
            ServerError::from(e)
        })?;

    info!(repo = %repo.name, files = summary.files_pushed, "project pushed to GitHub");
    Ok(Json(summary))
}

// ===== Workspaces =====

pub(super) async fn list_workspaces(
    State(state): State<AppState>,
    Query(query): Query<WorkspaceListQuery>,
) -> Result<Json<Vec<Workspace>>, ServerError> {
    let workspaces = state
        .workspaces
        .list_workspaces(query.user_token.as_deref())
        .await
        .map_err(ServerError::storage("Failed to fetch workspaces"))?;
    Ok(Json(workspaces))
}

pub(super) async fn create_workspace(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<CreateWorkspacePayload>,
) -> Result<Json<CreatedWorkspace>, ServerError> {
    let id = state
        .workspaces
        .create_workspace(payload.messages, payload.user_token)
        .await
        .map_err(ServerError::storage("Failed to create workspace"))?;
    Ok(Json(CreatedWorkspace { id }))
}

pub(super) async fn get_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workspace>, ServerError> {
    state
        .workspaces
        .get_workspace(&id)
        .await
        .map_err(ServerError::storage("Failed to fetch workspace"))?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound("Workspace not found".to_string()))
}

pub(super) async fn delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DeleteOutcome> {
    Json(state.workspaces.delete_workspace(&id).await)
}

pub(super) async fn update_workspace_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonExtractor(payload): JsonExtractor<UpdateMessagesPayload>,
) -> Result<Json<SuccessResponse>, ServerError> {
    let updated = state
        .workspaces
        .update_messages(&id, payload.messages)
        .await
        .map_err(ServerError::storage("Failed to update workspace"))?;
    workspace_updated(updated)
}

pub(super) async fn update_workspace_files(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonExtractor(payload): JsonExtractor<UpdateFilesPayload>,
) -> Result<Json<SuccessResponse>, ServerError> {
    let updated = state
        .workspaces
        .update_files(&id, payload.files)
        .await
        .map_err(ServerError::storage("Failed to update workspace"))?;
    workspace_updated(updated)
}

fn workspace_updated(updated: bool) -> Result<Json<SuccessResponse>, ServerError> {
    if updated {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(ServerError::NotFound("Workspace not found".to_string()))
    }
}
