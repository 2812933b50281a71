//! In-memory repositories (for testing and single-process deployments)

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::DEFAULT_PROJECT_TTL_HOURS;
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{next_project_id, DeleteOutcome, NewProject, Project, ProjectPatch, Workspace};
use crate::traits::{ProjectRepository, WorkspaceRepository};

/// Projects held in a vector, newest first
pub struct InMemoryProjectRepository {
    projects: RwLock<Vec<Project>>,
    ttl: Duration,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(Vec::new()),
            ttl: Duration::hours(DEFAULT_PROJECT_TTL_HOURS as i64),
        }
    }

    /// Override the project lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for InMemoryProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list(&self) -> RepositoryResult<Vec<Project>> {
        let mut projects = self.projects.write().await;
        let now = Utc::now();
        projects.retain(|p| !p.is_expired(now, self.ttl));
        Ok(projects.clone())
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<Project>> {
        let now = Utc::now();
        Ok(self
            .projects
            .read()
            .await
            .iter()
            .find(|p| p.id == id && !p.is_expired(now, self.ttl))
            .cloned())
    }

    async fn create(&self, project: NewProject) -> RepositoryResult<Project> {
        let mut projects = self.projects.write().await;
        let now = Utc::now();
        let id = next_project_id(&projects, now);
        let project = project.into_project(id, now, self.ttl);
        projects.insert(0, project.clone());
        Ok(project)
    }

    async fn update(&self, id: &str, patch: ProjectPatch) -> RepositoryResult<Project> {
        let mut projects = self.projects.write().await;
        let now = Utc::now();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id && !p.is_expired(now, self.ttl))
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })?;
        project.apply(patch);
        Ok(project.clone())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.projects.write().await.retain(|p| p.id != id);
        Ok(())
    }
}

/// Workspaces held in insertion order
#[derive(Default)]
pub struct InMemoryWorkspaceRepository {
    workspaces: RwLock<Vec<Workspace>>,
}

impl InMemoryWorkspaceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkspaceRepository for InMemoryWorkspaceRepository {
    async fn create_workspace(
        &self,
        messages: Value,
        user_token: Option<String>,
    ) -> RepositoryResult<String> {
        let id = Uuid::new_v4().to_string();
        self.workspaces.write().await.push(Workspace {
            id: id.clone(),
            messages,
            file_data: None,
            user_token,
        });
        Ok(id)
    }

    async fn list_workspaces(&self, user_token: Option<&str>) -> RepositoryResult<Vec<Workspace>> {
        let Some(token) = user_token else {
            return Ok(Vec::new());
        };

        Ok(self
            .workspaces
            .read()
            .await
            .iter()
            .filter(|w| w.user_token.as_deref() == Some(token))
            .cloned()
            .collect())
    }

    async fn get_workspace(&self, id: &str) -> RepositoryResult<Option<Workspace>> {
        Ok(self
            .workspaces
            .read()
            .await
            .iter()
            .find(|w| w.id == id)
            .cloned())
    }

    async fn update_messages(&self, id: &str, messages: Value) -> RepositoryResult<bool> {
        let mut workspaces = self.workspaces.write().await;
        match workspaces.iter_mut().find(|w| w.id == id) {
            Some(ws) => {
                ws.messages = messages;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_files(&self, id: &str, files: Value) -> RepositoryResult<bool> {
        let mut workspaces = self.workspaces.write().await;
        match workspaces.iter_mut().find(|w| w.id == id) {
            Some(ws) => {
                ws.file_data = Some(files);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_workspace(&self, id: &str) -> DeleteOutcome {
        let mut workspaces = self.workspaces.write().await;
        let before = workspaces.len();
        workspaces.retain(|w| w.id != id);

        if workspaces.len() == before {
            DeleteOutcome::failed(format!("Workspace {} does not exist", id))
        } else {
            DeleteOutcome::ok()
        }
    }
}
