//! Persistence layer for TechWiser
//!
//! This crate stores what the generator produces:
//!
//! - **Projects**: generated file bundles plus chat history, kept for a
//!   limited time in a JSON file on disk
//! - **Workspaces**: chat workspaces in a hosted Convex deployment, keyed by
//!   an opaque user token
//!
//! # Quick Start
//!
//! ```no_run
//! use techwiser_repository::{NewProject, ProjectRepository, RepositoryConfig, RepositoryLoader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), techwiser_repository::RepositoryError> {
//!     let repos = RepositoryLoader::new(RepositoryConfig::file_system("data")).build()?;
//!
//!     let project = repos
//!         .projects
//!         .create(NewProject {
//!             title: "Weather dashboard".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Saved project {}", project.id);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod file_system;
pub mod loader;
pub mod memory;
pub mod models;
pub mod traits;

#[cfg(feature = "convex")]
pub mod convex;

// Re-exports - Configuration
pub use config::{RepositoryConfig, RepositorySource};

// Re-exports - Error
pub use error::{RepositoryError, RepositoryResult};

// Re-exports - Loader
pub use loader::{Repositories, RepositoryLoader};

// Re-exports - Repositories
pub use file_system::FileSystemProjectRepository;
pub use memory::{InMemoryProjectRepository, InMemoryWorkspaceRepository};
pub use models::*;
pub use traits::*;

#[cfg(feature = "convex")]
pub use convex::ConvexWorkspaceRepository;
