//! Generate-and-persist flow behind `POST /api/generate`

use crate::error::ServerError;
use chrono::{DateTime, Local, TimeZone};
use techwiser_core::{ChatMessage, Language};
use techwiser_llm::{AppGenerator, GenerateOptions};
use techwiser_repository::{NewProject, Project, ProjectPatch, ProjectRepository};
use tracing::info;

const TITLE_CHARS: usize = 30;

/// One generation round
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Raw user prompt
    pub prompt: String,
    /// Response language; prefixes the prompt when set
    pub language: Option<Language>,
    /// Project to continue; a new project is created when `None`
    pub project_id: Option<String>,
    pub options: GenerateOptions,
}

/// Project title derived from the first message
pub fn project_title(message: &str) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(TITLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// `HH:MM` label shown in the project list
pub fn time_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M").to_string()
}

/// Generate files for `request` and save them to a new or existing project
pub async fn generate_project(
    projects: &dyn ProjectRepository,
    generator: &AppGenerator,
    request: GenerationRequest,
) -> Result<Project, ServerError> {
    if request.prompt.trim().is_empty() {
        return Err(ServerError::InvalidRequest("Prompt is required".to_string()));
    }

    let message = match request.language {
        Some(language) => language.apply(&request.prompt),
        None => request.prompt,
    };

    let existing = match request.project_id.as_deref() {
        Some(id) => Some(load_project(projects, id).await?),
        None => None,
    };

    run_round(projects, generator, existing, message, &request.options).await
}

/// Re-run a project's last prompt against its current history
pub async fn regenerate_project(
    projects: &dyn ProjectRepository,
    generator: &AppGenerator,
    id: &str,
    options: &GenerateOptions,
) -> Result<Project, ServerError> {
    let project = load_project(projects, id).await?;
    if project.last_prompt.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "Project has no prompt to regenerate".to_string(),
        ));
    }

    let message = project.last_prompt.clone();
    run_round(projects, generator, Some(project), message, options).await
}

async fn load_project(projects: &dyn ProjectRepository, id: &str) -> Result<Project, ServerError> {
    projects
        .get(id)
        .await
        .map_err(ServerError::storage("Failed to fetch projects"))?
        .ok_or_else(|| ServerError::NotFound("Project not found".to_string()))
}

async fn run_round(
    projects: &dyn ProjectRepository,
    generator: &AppGenerator,
    existing: Option<Project>,
    message: String,
    options: &GenerateOptions,
) -> Result<Project, ServerError> {
    let history = existing
        .as_ref()
        .map(|p| p.chat_history.clone())
        .unwrap_or_default();

    let result = generator.generate(&message, &history, options).await?;

    let mut new_history = history;
    new_history.push(ChatMessage::user(message.clone()));
    new_history.push(ChatMessage::model(result.description));

    let date = time_label(&Local::now());

    match existing {
        Some(project) => {
            let patch = ProjectPatch {
                title: Some(project.title),
                date: Some(date),
                files: Some(result.files),
                last_prompt: Some(message),
                chat_history: Some(new_history),
                ..Default::default()
            };
            let saved = projects
                .update(&project.id, patch)
                .await
                .map_err(|e| match e {
                    e if e.is_not_found() => ServerError::NotFound("Project not found".to_string()),
                    e => ServerError::storage("Failed to update project")(e),
                })?;
            info!(project = %saved.id, files = saved.files.len(), "project updated");
            Ok(saved)
        }
        None => {
            let new_project = NewProject {
                title: project_title(&message),
                date,
                files: result.files,
                last_prompt: message,
                chat_history: new_history,
                ..Default::default()
            };
            let saved = projects
                .create(new_project)
                .await
                .map_err(ServerError::storage("Failed to create project"))?;
            info!(project = %saved.id, files = saved.files.len(), "project created");
            Ok(saved)
        }
    }
}
