//! REST API type definitions
//!
//! Request and response types for the REST API endpoints.

use crate::github::GitHubClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use techwiser_core::Language;
use techwiser_llm::{ApiKeys, AppGenerator, GenerateOptions, ModelCatalog, ModelInfo};
use techwiser_repository::{ProjectRepository, WorkspaceRepository};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn ProjectRepository>,
    pub workspaces: Arc<dyn WorkspaceRepository>,
    pub generator: Arc<AppGenerator>,
    pub catalog: Arc<ModelCatalog>,
    pub github: Arc<GitHubClient>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `{ "success": true }`
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Generation request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayload {
    pub prompt: String,

    #[serde(default)]
    pub language: Option<Language>,

    /// Continue this project instead of creating one
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    /// Custom Gemini key overriding the server's
    #[serde(default)]
    pub gemini_key: Option<String>,

    #[serde(default)]
    pub open_router_key: Option<String>,
}

impl GeneratePayload {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions::new(
            self.model.clone(),
            ApiKeys::new(self.gemini_key.clone(), self.open_router_key.clone()),
        )
    }
}

/// Regeneration request; the body may be omitted entirely
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegeneratePayload {
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub gemini_key: Option<String>,

    #[serde(default)]
    pub open_router_key: Option<String>,
}

impl RegeneratePayload {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions::new(
            self.model.clone(),
            ApiKeys::new(self.gemini_key.clone(), self.open_router_key.clone()),
        )
    }
}

/// Model picker contents
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub gemini: Vec<ModelInfo>,
    pub openrouter: Vec<ModelInfo>,
}

/// Query string of the OAuth callback
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// Push a saved project to a new GitHub repository
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    /// OAuth access token
    pub token: String,

    pub repo_name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub private: bool,

    pub project_id: String,
}

/// `GET /api/workspaces` query
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceListQuery {
    #[serde(default)]
    pub user_token: Option<String>,
}

/// Workspace create request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspacePayload {
    #[serde(default)]
    pub messages: Value,

    #[serde(default)]
    pub user_token: Option<String>,
}

/// Id of a newly created workspace
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedWorkspace {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessagesPayload {
    pub messages: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFilesPayload {
    #[serde(alias = "fileData")]
    pub files: Value,
}
