//! Core trait definitions for the repository pattern
//!
//! - [`ProjectRepository`]: generated projects with a fixed lifetime
//! - [`WorkspaceRepository`]: chat workspaces keyed by an opaque user token
//!
//! # Examples
//!
//! ```no_run
//! use techwiser_repository::{FileSystemProjectRepository, NewProject, ProjectRepository};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), techwiser_repository::RepositoryError> {
//! let repo = FileSystemProjectRepository::new("data");
//!
//! let project = repo
//!     .create(NewProject {
//!         title: "Todo app".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! for p in repo.list().await? {
//!     println!("{} {}", p.id, p.title);
//! }
//! # let _ = project;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{DeleteOutcome, NewProject, Project, ProjectPatch, Workspace};
use crate::RepositoryResult;

/// Storage for generated projects
///
/// # Implementation Notes
///
/// - `list` drops projects older than the configured lifetime
/// - New projects go to the front, so `list` is newest first
/// - Deleting an unknown id is not an error
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All live projects, newest first
    async fn list(&self) -> RepositoryResult<Vec<Project>>;

    /// A live project by id
    async fn get(&self, id: &str) -> RepositoryResult<Option<Project>>;

    /// Store a new project and return it with id and timestamps assigned
    async fn create(&self, project: NewProject) -> RepositoryResult<Project>;

    /// Merge `patch` into an existing project
    ///
    /// # Errors
    /// `RepositoryError::NotFound` when no project has this id
    async fn update(&self, id: &str, patch: ProjectPatch) -> RepositoryResult<Project>;

    /// Remove a project if present
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// Storage for chat workspaces
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Create a workspace and return its id
    async fn create_workspace(
        &self,
        messages: Value,
        user_token: Option<String>,
    ) -> RepositoryResult<String>;

    /// Workspaces owned by `user_token`; empty when no token is given
    async fn list_workspaces(&self, user_token: Option<&str>) -> RepositoryResult<Vec<Workspace>>;

    async fn get_workspace(&self, id: &str) -> RepositoryResult<Option<Workspace>>;

    /// Replace the messages; `false` when the workspace does not exist
    async fn update_messages(&self, id: &str, messages: Value) -> RepositoryResult<bool>;

    /// Replace the file data; `false` when the workspace does not exist
    async fn update_files(&self, id: &str, files: Value) -> RepositoryResult<bool>;

    /// Delete a workspace; failures are reported in the outcome
    async fn delete_workspace(&self, id: &str) -> DeleteOutcome;
}
