//! Generated source files

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// A single source file produced by the generation client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the project root (e.g. "components/Button.tsx")
    pub path: String,

    /// Full file content
    pub content: String,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Return the path in a form safe to write below a project root.
    ///
    /// Leading `./` and `/` are stripped and backslashes become forward
    /// slashes. Empty paths and paths with a `..` component are rejected.
    pub fn normalized_path(&self) -> Result<String> {
        let unified = self.path.trim().replace('\\', "/");

        let mut parts = Vec::new();
        for part in unified.split('/') {
            match part {
                "" | "." => continue,
                ".." => return Err(CoreError::UnsafePath(self.path.clone())),
                other => parts.push(other),
            }
        }

        if parts.is_empty() {
            return Err(CoreError::UnsafePath(self.path.clone()));
        }

        Ok(parts.join("/"))
    }
}

/// Output of one generation call: the files plus a short summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated files
    pub files: Vec<GeneratedFile>,

    /// Brief explanation of what was built
    #[serde(default)]
    pub description: String,
}

impl GenerationResult {
    /// Create a new generation result
    pub fn new(files: Vec<GeneratedFile>, description: impl Into<String>) -> Self {
        Self {
            files,
            description: description.into(),
        }
    }

    /// Whether the result carries no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
