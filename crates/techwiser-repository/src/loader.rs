//! Repository construction from configuration

use std::sync::Arc;
use tracing::info;

use crate::config::{RepositoryConfig, RepositorySource};
use crate::error::RepositoryResult;
use crate::file_system::FileSystemProjectRepository;
use crate::memory::{InMemoryProjectRepository, InMemoryWorkspaceRepository};
use crate::traits::{ProjectRepository, WorkspaceRepository};

/// The pair of stores the server works with
#[derive(Clone)]
pub struct Repositories {
    pub projects: Arc<dyn ProjectRepository>,
    pub workspaces: Arc<dyn WorkspaceRepository>,
}

/// Builds [`Repositories`] from a [`RepositoryConfig`]
///
/// # Example
///
/// ```rust,ignore
/// use techwiser_repository::{RepositoryConfig, RepositoryLoader};
///
/// let repos = RepositoryLoader::new(RepositoryConfig::file_system("data")).build()?;
/// let projects = repos.projects.list().await?;
/// ```
pub struct RepositoryLoader {
    config: RepositoryConfig,
}

impl RepositoryLoader {
    /// Create a new repository loader
    pub fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Validate the configuration and construct the stores
    pub fn build(&self) -> RepositoryResult<Repositories> {
        self.config.validate()?;

        let ttl = self.config.project_ttl();

        let repos = match self.config.source {
            RepositorySource::Memory => Repositories {
                projects: Arc::new(InMemoryProjectRepository::new().with_ttl(ttl)),
                workspaces: Arc::new(InMemoryWorkspaceRepository::new()),
            },
            RepositorySource::FileSystem => Repositories {
                projects: Arc::new(
                    FileSystemProjectRepository::new(&self.config.data_dir).with_ttl(ttl),
                ),
                workspaces: Arc::new(InMemoryWorkspaceRepository::new()),
            },
            RepositorySource::Convex => Repositories {
                projects: Arc::new(
                    FileSystemProjectRepository::new(&self.config.data_dir).with_ttl(ttl),
                ),
                workspaces: self.convex_workspaces()?,
            },
        };

        info!(source = ?self.config.source, "repositories ready");
        Ok(repos)
    }

    #[cfg(feature = "convex")]
    fn convex_workspaces(&self) -> RepositoryResult<Arc<dyn WorkspaceRepository>> {
        let url = self.config.convex_url.clone().unwrap_or_default();
        Ok(Arc::new(crate::convex::ConvexWorkspaceRepository::new(
            url,
            self.config.convex_key.clone(),
        )?))
    }

    #[cfg(not(feature = "convex"))]
    fn convex_workspaces(&self) -> RepositoryResult<Arc<dyn WorkspaceRepository>> {
        Err(crate::error::RepositoryError::InvalidConfig(
            "convex source requires the `convex` feature".to_string(),
        ))
    }
}
