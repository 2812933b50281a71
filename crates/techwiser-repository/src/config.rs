//! Repository configuration types
//!
//! Projects always live in a JSON file (or in memory for tests). The
//! `source` decides where workspaces go: the hosted document store, or an
//! in-process map.

use crate::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default directory for `projects.json`
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default project lifetime
pub const DEFAULT_PROJECT_TTL_HOURS: u64 = 24;

/// Repository source type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositorySource {
    /// Projects in `{data_dir}/projects.json`, workspaces in memory
    #[default]
    FileSystem,
    /// Everything in memory (for testing)
    Memory,
    /// Projects on disk, workspaces in a Convex deployment
    Convex,
}

/// Repository configuration
///
/// # Examples
///
/// ```rust
/// use techwiser_repository::RepositoryConfig;
///
/// // Local JSON file
/// let config = RepositoryConfig::file_system("data");
///
/// // Hosted document store
/// let config = RepositoryConfig::convex("https://happy-otter-123.convex.cloud")
///     .with_convex_key("prod:secret");
///
/// // Memory repository (for testing)
/// let config = RepositoryConfig::memory();
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Configuration source type
    pub source: RepositorySource,

    /// Directory holding `projects.json`
    pub data_dir: String,

    /// Convex deployment URL (required for Convex source)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convex_url: Option<String>,

    /// Convex deploy key (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convex_key: Option<String>,

    /// Hours before a project expires
    pub project_ttl_hours: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            source: RepositorySource::FileSystem,
            data_dir: DEFAULT_DATA_DIR.to_string(),
            convex_url: None,
            convex_key: None,
            project_ttl_hours: DEFAULT_PROJECT_TTL_HOURS,
        }
    }
}

impl fmt::Debug for RepositoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryConfig")
            .field("source", &self.source)
            .field("data_dir", &self.data_dir)
            .field("convex_url", &self.convex_url)
            .field("convex_key", &self.convex_key.as_ref().map(|_| "<redacted>"))
            .field("project_ttl_hours", &self.project_ttl_hours)
            .finish()
    }
}

impl RepositoryConfig {
    /// Create a file system repository configuration
    pub fn file_system(data_dir: impl Into<String>) -> Self {
        Self {
            source: RepositorySource::FileSystem,
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Create a memory repository configuration
    pub fn memory() -> Self {
        Self {
            source: RepositorySource::Memory,
            ..Default::default()
        }
    }

    /// Create a Convex repository configuration
    pub fn convex(url: impl Into<String>) -> Self {
        Self {
            source: RepositorySource::Convex,
            convex_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Set the Convex deploy key
    pub fn with_convex_key(mut self, key: impl Into<String>) -> Self {
        self.convex_key = Some(key.into());
        self
    }

    /// Set the directory holding `projects.json`
    pub fn with_data_dir(mut self, data_dir: impl Into<String>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Set the project lifetime
    pub fn with_project_ttl_hours(mut self, hours: u64) -> Self {
        self.project_ttl_hours = hours;
        self
    }

    /// Project lifetime as a duration
    pub fn project_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.project_ttl_hours as i64)
    }

    /// Validate the configuration
    pub fn validate(&self) -> RepositoryResult<()> {
        if self.project_ttl_hours == 0 {
            return Err(RepositoryError::InvalidConfig(
                "project_ttl_hours must be greater than zero".to_string(),
            ));
        }

        match self.source {
            RepositorySource::FileSystem => {
                if self.data_dir.trim().is_empty() {
                    return Err(RepositoryError::InvalidConfig(
                        "data_dir is required for file_system source".to_string(),
                    ));
                }
            }
            RepositorySource::Convex => {
                let url = self.convex_url.as_deref().unwrap_or("").trim();
                if url.is_empty() {
                    return Err(RepositoryError::InvalidConfig(
                        "convex_url is required for convex source".to_string(),
                    ));
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(RepositoryError::InvalidConfig(format!(
                        "convex_url must be an http(s) URL, got {}",
                        url
                    )));
                }
            }
            RepositorySource::Memory => {}
        }

        Ok(())
    }
}
