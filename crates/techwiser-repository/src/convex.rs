//! Convex workspace repository
//!
//! Talks to a Convex deployment through its public HTTP function API.
//!
//! # API
//!
//! Queries and mutations are invoked with
//!
//! ```text
//! POST {deployment}/api/query
//! POST {deployment}/api/mutation
//!
//! { "path": "workspace:GetWorkspace", "args": { ... }, "format": "json" }
//! ```
//!
//! and answer with either
//!
//! ```json
//! { "status": "success", "value": ... }
//! { "status": "error", "errorMessage": "..." }
//! ```
//!
//! # Authentication
//!
//! If a deploy key is configured it is sent as:
//!
//! ```text
//! Authorization: Convex {deploy_key}
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{DeleteOutcome, Workspace};
use crate::traits::WorkspaceRepository;

/// Module holding the workspace functions in the deployment
const MODULE: &str = "workspace";

#[derive(Debug, Clone, Copy)]
enum FunctionKind {
    Query,
    Mutation,
}

impl FunctionKind {
    fn endpoint(&self) -> &'static str {
        match self {
            FunctionKind::Query => "query",
            FunctionKind::Mutation => "mutation",
        }
    }
}

/// Response envelope of the function API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionResponse {
    status: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error_message: Option<String>,
}

/// Workspace repository backed by a Convex deployment
pub struct ConvexWorkspaceRepository {
    /// HTTP client for making requests
    client: Client,

    /// Deployment URL (e.g., "https://happy-otter-123.convex.cloud")
    base_url: String,

    /// Optional deploy key
    deploy_key: Option<String>,
}

impl ConvexWorkspaceRepository {
    /// Create a new Convex repository
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        deploy_key: Option<impl Into<String>>,
    ) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                RepositoryError::ApiError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            deploy_key: deploy_key.map(|k| k.into()),
        })
    }

    /// Invoke `workspace:{function}` and return its value
    async fn run(&self, kind: FunctionKind, function: &str, args: Value) -> RepositoryResult<Value> {
        let url = format!("{}/api/{}", self.base_url, kind.endpoint());
        let path = format!("{}:{}", MODULE, function);

        debug!(function = %path, "calling Convex {}", kind.endpoint());

        let mut request = self.client.post(&url).json(&json!({
            "path": path,
            "args": args,
            "format": "json",
        }));

        if let Some(ref key) = self.deploy_key {
            request = request.header("Authorization", format!("Convex {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::ApiError(format!("Failed to call {}: {}", path, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::ApiError(format!("Failed to read response body: {}", e)))?;

        // Function errors come back as a JSON envelope, with or without a 2xx status
        let parsed: FunctionResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(RepositoryError::ApiError(format!(
                    "Convex returned error status {} for {}",
                    status, path
                )));
            }
            Err(e) => return Err(RepositoryError::Serialization(e)),
        };

        if parsed.status == "success" {
            Ok(parsed.value)
        } else {
            let message = parsed
                .error_message
                .unwrap_or_else(|| format!("{} failed with status {}", path, status));
            warn!(function = %path, "Convex function failed: {}", message);
            Err(RepositoryError::Backend(message))
        }
    }

    async fn update_field(&self, function: &str, id: &str, field: &str, value: Value) -> RepositoryResult<bool> {
        if self.get_workspace(id).await?.is_none() {
            return Ok(false);
        }

        let mut args = Map::new();
        args.insert("workspaceId".to_string(), Value::String(id.to_string()));
        args.insert(field.to_string(), value);

        self.run(FunctionKind::Mutation, function, Value::Object(args))
            .await?;
        Ok(true)
    }
}

#[async_trait]
impl WorkspaceRepository for ConvexWorkspaceRepository {
    async fn create_workspace(
        &self,
        messages: Value,
        user_token: Option<String>,
    ) -> RepositoryResult<String> {
        let mut args = Map::new();
        args.insert("messages".to_string(), messages);
        // Optional validators reject an explicit null
        if let Some(token) = user_token {
            args.insert("userToken".to_string(), Value::String(token));
        }

        let value = self
            .run(FunctionKind::Mutation, "CreateWorkspace", Value::Object(args))
            .await?;

        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RepositoryError::Backend(format!("Unexpected workspace id: {}", value)))
    }

    async fn list_workspaces(&self, user_token: Option<&str>) -> RepositoryResult<Vec<Workspace>> {
        let Some(token) = user_token else {
            return Ok(Vec::new());
        };

        let value = self
            .run(
                FunctionKind::Query,
                "GetAllWorkspaces",
                json!({ "userToken": token }),
            )
            .await?;

        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn get_workspace(&self, id: &str) -> RepositoryResult<Option<Workspace>> {
        let value = self
            .run(FunctionKind::Query, "GetWorkspace", json!({ "workspaceId": id }))
            .await?;

        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn update_messages(&self, id: &str, messages: Value) -> RepositoryResult<bool> {
        self.update_field("UpdateWorkspace", id, "messages", messages)
            .await
    }

    async fn update_files(&self, id: &str, files: Value) -> RepositoryResult<bool> {
        self.update_field("UpdateFiles", id, "files", files).await
    }

    async fn delete_workspace(&self, id: &str) -> DeleteOutcome {
        let result = self
            .run(FunctionKind::Mutation, "DeleteWorkspace", json!({ "workspaceId": id }))
            .await;

        match result {
            Ok(value) => serde_json::from_value(value).unwrap_or_else(|_| DeleteOutcome::ok()),
            Err(e) => DeleteOutcome::failed(e.to_string()),
        }
    }
}
