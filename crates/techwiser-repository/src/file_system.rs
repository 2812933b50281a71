//! JSON file based project repository

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_PROJECT_TTL_HOURS;
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{next_project_id, NewProject, Project, ProjectPatch};
use crate::traits::ProjectRepository;

/// File name inside the data directory
pub const PROJECTS_FILE: &str = "projects.json";

/// Project repository backed by a single JSON array on disk
///
/// Every operation reads the whole file and writes it back; an async mutex
/// keeps read-modify-write sequences from interleaving.
pub struct FileSystemProjectRepository {
    /// Path to `projects.json`
    path: PathBuf,
    /// Project lifetime
    ttl: Duration,
    lock: Mutex<()>,
}

impl FileSystemProjectRepository {
    /// Create a repository storing `{data_dir}/projects.json`
    ///
    /// The directory and file are created on first use.
    ///
    /// # Example
    /// ```no_run
    /// use techwiser_repository::FileSystemProjectRepository;
    ///
    /// let repo = FileSystemProjectRepository::new("data");
    /// ```
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(PROJECTS_FILE),
            ttl: Duration::hours(DEFAULT_PROJECT_TTL_HOURS as i64),
            lock: Mutex::new(()),
        }
    }

    /// Override the project lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the directory and an empty array exist
    async fn ensure_db(&self) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        if fs::metadata(&self.path).await.is_err() {
            debug!(path = %self.path.display(), "creating empty project store");
            fs::write(&self.path, "[]").await?;
        }
        Ok(())
    }

    /// Load every readable project
    ///
    /// Entries without a parseable `createdAt` are skipped; the second value
    /// counts them so callers can prune them from disk.
    async fn read_all(&self) -> RepositoryResult<(Vec<Project>, usize)> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
            Err(e) => return Err(RepositoryError::Io(e)),
        };

        if data.trim().is_empty() {
            return Ok((Vec::new(), 0));
        }

        let entries: Vec<Value> = serde_json::from_str(&data)?;
        let total = entries.len();
        let projects: Vec<Project> = entries
            .into_iter()
            .filter_map(|entry| decode_entry(entry, self.ttl))
            .collect();

        let skipped = total - projects.len();
        if skipped > 0 {
            warn!(skipped, path = %self.path.display(), "skipping unreadable project entries");
        }
        Ok((projects, skipped))
    }

    async fn write_all(&self, projects: &[Project]) -> RepositoryResult<()> {
        let data = serde_json::to_string_pretty(projects)?;
        fs::write(&self.path, data).await?;
        Ok(())
    }
}

/// Decode one stored entry, filling a missing `expiresAt` from `createdAt`
fn decode_entry(mut entry: Value, ttl: Duration) -> Option<Project> {
    let created_at = entry
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())?
        .with_timezone(&Utc);

    if let Some(fields) = entry.as_object_mut() {
        if !fields.get("expiresAt").map_or(false, Value::is_string) {
            fields.insert(
                "expiresAt".to_string(),
                Value::String((created_at + ttl).to_rfc3339()),
            );
        }
    }

    match serde_json::from_value(entry) {
        Ok(project) => Some(project),
        Err(e) => {
            debug!(error = %e, "unreadable project entry");
            None
        }
    }
}

#[async_trait]
impl ProjectRepository for FileSystemProjectRepository {
    async fn list(&self) -> RepositoryResult<Vec<Project>> {
        let _guard = self.lock.lock().await;
        self.ensure_db().await?;

        let (projects, skipped) = self.read_all().await?;
        let total = projects.len();

        let now = Utc::now();
        let live: Vec<Project> = projects
            .into_iter()
            .filter(|p| !p.is_expired(now, self.ttl))
            .collect();

        if live.len() != total || skipped > 0 {
            info!(
                expired = total - live.len(),
                unreadable = skipped,
                "pruning expired projects"
            );
            self.write_all(&live).await?;
        }

        Ok(live)
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<Project>> {
        let _guard = self.lock.lock().await;

        let now = Utc::now();
        Ok(self
            .read_all()
            .await?
            .0
            .into_iter()
            .find(|p| p.id == id && !p.is_expired(now, self.ttl)))
    }

    async fn create(&self, project: NewProject) -> RepositoryResult<Project> {
        let _guard = self.lock.lock().await;
        self.ensure_db().await?;

        let (mut projects, _) = self.read_all().await?;
        let now = Utc::now();
        let id = next_project_id(&projects, now);
        let project = project.into_project(id, now, self.ttl);

        projects.insert(0, project.clone());
        self.write_all(&projects).await?;

        debug!(id = %project.id, "project created");
        Ok(project)
    }

    async fn update(&self, id: &str, patch: ProjectPatch) -> RepositoryResult<Project> {
        let _guard = self.lock.lock().await;

        let (mut projects, _) = self.read_all().await?;
        let now = Utc::now();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id && !p.is_expired(now, self.ttl))
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })?;

        project.apply(patch);
        let updated = project.clone();

        self.ensure_db().await?;
        self.write_all(&projects).await?;

        debug!(id = %id, "project updated");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let _guard = self.lock.lock().await;

        let (mut projects, _) = self.read_all().await?;
        projects.retain(|p| p.id != id);

        self.ensure_db().await?;
        self.write_all(&projects).await?;

        debug!(id = %id, "project deleted");
        Ok(())
    }
}
