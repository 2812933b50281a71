//! GitHub OAuth and repository push

use crate::config::GitHubConfig;
use crate::error::ServerError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use techwiser_core::GeneratedFile;
use thiserror::Error;
use tracing::{error, info, warn};

const USER_AGENT: &str = "TechWiser";
const OAUTH_SCOPE: &str = "repo workflow";
const STATE_LEN: usize = 7;

/// GitHub integration errors
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub Client ID is not configured. Set TECHWISER_GITHUB__CLIENT_ID or GITHUB_CLIENT_ID.")]
    MissingClientId,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsafe file path: {0}")]
    InvalidPath(String),

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Repository already exists")]
    RepositoryExists,

    #[error("{0}")]
    Api(String),
}

impl From<GitHubError> for ServerError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::MissingClientId | GitHubError::InvalidUrl(_) => {
                ServerError::InternalError(err.to_string())
            }
            GitHubError::InvalidPath(_) => ServerError::InvalidRequest(err.to_string()),
            GitHubError::Unauthorized(msg) => ServerError::Unauthorized(msg),
            GitHubError::RepositoryExists => ServerError::Conflict(err.to_string()),
            GitHubError::Http(_) | GitHubError::Api(_) => ServerError::BadGateway(err.to_string()),
        }
    }
}

/// Outcome of a repository push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSummary {
    /// Web URL of the new repository
    pub url: String,
    pub files_pushed: usize,
}

/// Options for a new repository
#[derive(Debug, Clone, Default)]
pub struct NewRepository {
    pub name: String,
    pub description: Option<String>,
    pub private: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedRepository {
    name: String,
    html_url: String,
    owner: RepositoryOwner,
}

#[derive(Debug, Deserialize)]
struct RepositoryOwner {
    login: String,
}

/// Random OAuth `state`: lowercase letters and digits
pub fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

/// Client for the GitHub OAuth endpoints and REST API
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
    redirect_base: Url,
}

impl GitHubClient {
    /// Create a client; OAuth redirects land on `public_url`
    pub fn new(config: GitHubConfig, public_url: &str) -> Result<Self, GitHubError> {
        let redirect_base = Url::parse(public_url)
            .and_then(|u| u.join("/"))
            .map_err(|e| GitHubError::InvalidUrl(format!("{}: {}", public_url, e)))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            redirect_base,
        })
    }

    /// GitHub configuration in use
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// Authorize URL the login endpoint redirects to
    pub fn authorize_url(&self, state: &str) -> Result<String, GitHubError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(GitHubError::MissingClientId)?;

        let url = Url::parse_with_params(
            &format!("{}/login/oauth/authorize", self.oauth_base()),
            &[
                ("client_id", client_id),
                ("scope", OAUTH_SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| GitHubError::InvalidUrl(e.to_string()))?;

        Ok(url.into())
    }

    /// Where the OAuth callback sends the browser.
    ///
    /// Always yields a redirect: failures become `?github_error=<reason>`,
    /// success becomes `?github_token=<token>`.
    pub async fn callback_redirect(&self, code: Option<&str>, error: Option<&str>) -> String {
        if let Some(error) = error.filter(|e| !e.is_empty()) {
            warn!("GitHub authorization denied: {}", error);
            return self.redirect_with("github_error", error);
        }

        let code = match code.filter(|c| !c.is_empty()) {
            Some(code) => code,
            None => return self.redirect_with("github_error", "no_code"),
        };

        let (client_id, client_secret) = match (
            self.config.client_id.as_deref().filter(|v| !v.is_empty()),
            self.config.client_secret.as_deref().filter(|v| !v.is_empty()),
        ) {
            (Some(id), Some(secret)) => (id, secret),
            _ => {
                warn!("GitHub OAuth callback hit without client credentials configured");
                return self.redirect_with("github_error", "missing_env");
            }
        };

        match self.exchange_code(client_id, client_secret, code).await {
            Ok(TokenResponse {
                error: Some(error), ..
            }) => {
                warn!("GitHub token exchange rejected: {}", error);
                self.redirect_with("github_error", &error)
            }
            Ok(TokenResponse {
                access_token: Some(token),
                ..
            }) => {
                info!("GitHub token exchange succeeded");
                self.redirect_with("github_token", &token)
            }
            Ok(_) => self.redirect_with("github_error", "no_token"),
            Err(e) => {
                error!("GitHub OAuth error: {}", e);
                self.redirect_with("github_error", "server_error")
            }
        }
    }

    async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<TokenResponse, GitHubError> {
        let resp = self
            .client
            .post(format!("{}/login/oauth/access_token", self.oauth_base()))
            .header("Accept", "application/json")
            .json(&json!({
                "client_id": client_id,
                "client_secret": client_secret,
                "code": code,
            }))
            .send()
            .await?;

        Ok(resp.json::<TokenResponse>().await?)
    }

    fn redirect_with(&self, key: &str, value: &str) -> String {
        let mut url = self.redirect_base.clone();
        url.query_pairs_mut().append_pair(key, value);
        url.into()
    }

    /// Create a repository for the token's user and upload `files` to it
    pub async fn push(
        &self,
        token: &str,
        repo: &NewRepository,
        files: &[GeneratedFile],
    ) -> Result<PushSummary, GitHubError> {
        let mut paths = Vec::with_capacity(files.len());
        for file in files {
            let path = file
                .normalized_path()
                .map_err(|_| GitHubError::InvalidPath(file.path.clone()))?;
            paths.push(path);
        }

        let created = self.create_repository(token, repo).await?;
        info!(
            repo = %created.name,
            files = files.len(),
            "created GitHub repository"
        );

        for (path, file) in paths.iter().zip(files) {
            self.put_file(token, &created, path, &file.content).await?;
        }

        Ok(PushSummary {
            url: created.html_url,
            files_pushed: files.len(),
        })
    }

    async fn create_repository(
        &self,
        token: &str,
        repo: &NewRepository,
    ) -> Result<CreatedRepository, GitHubError> {
        let resp = self
            .client
            .post(self.api_url(&["user", "repos"])?)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .json(&json!({
                "name": repo.name,
                "description": repo.description.clone().unwrap_or_default(),
                "private": repo.private,
                "auto_init": false,
            }))
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(GitHubError::RepositoryExists);
        }
        if !status.is_success() {
            return Err(api_error(status, resp).await);
        }

        Ok(resp.json::<CreatedRepository>().await?)
    }

    async fn put_file(
        &self,
        token: &str,
        repo: &CreatedRepository,
        path: &str,
        content: &str,
    ) -> Result<(), GitHubError> {
        let mut segments = vec!["repos", repo.owner.login.as_str(), repo.name.as_str(), "contents"];
        segments.extend(path.split('/'));

        let resp = self
            .client
            .put(self.api_url(&segments)?)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .json(&json!({
                "message": format!("Add {}", path),
                "content": STANDARD.encode(content.as_bytes()),
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(api_error(status, resp).await);
        }
        Ok(())
    }

    fn oauth_base(&self) -> &str {
        self.config.oauth_base_url.trim_end_matches('/')
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, GitHubError> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| GitHubError::InvalidUrl(format!("{}: {}", self.config.api_base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidUrl(self.config.api_base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

async fn api_error(status: StatusCode, resp: reqwest::Response) -> GitHubError {
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    let message = body["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("GitHub API error: {}", status));

    if status == StatusCode::UNAUTHORIZED {
        GitHubError::Unauthorized(message)
    } else {
        GitHubError::Api(message)
    }
}
