//! Server configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use techwiser_llm::provider::{GEMINI_BASE_URL, OPENROUTER_BASE_URL};
use techwiser_llm::{ProviderSettings, DEFAULT_MODEL};
use techwiser_repository::RepositoryConfig;

/// GitHub OAuth app and API endpoints
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// OAuth app client id
    pub client_id: Option<String>,

    /// OAuth app client secret
    pub client_secret: Option<String>,

    /// Base of the OAuth endpoints (`/login/oauth/...`)
    pub oauth_base_url: String,

    /// REST API base
    pub api_base_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            oauth_base_url: "https://github.com".to_string(),
            api_base_url: "https://api.github.com".to_string(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("oauth_base_url", &self.oauth_base_url)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Upstream model API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub gemini_base_url: String,
    pub openrouter_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            openrouter_base_url: OPENROUTER_BASE_URL.to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Server configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port (HTTP)
    pub port: u16,

    /// Public URL of the front end; OAuth redirects land here
    pub public_url: String,

    /// Log level
    pub log_level: String,

    /// Model used when a request does not pick one
    pub default_model: String,

    /// Server-side Gemini key
    pub gemini_api_key: Option<String>,

    /// Persistence configuration
    pub repository: RepositoryConfig,

    /// GitHub integration
    pub github: GitHubConfig,

    /// Model API endpoints
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            public_url: "http://127.0.0.1:8080".to_string(),
            log_level: "info".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            gemini_api_key: None,
            repository: RepositoryConfig::default(),
            github: GitHubConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("public_url", &self.public_url)
            .field("log_level", &self.log_level)
            .field("default_model", &self.default_model)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("repository", &self.repository)
            .field("github", &self.github)
            .field("llm", &self.llm)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config file
    ///
    /// Sources, later ones winning:
    /// 1. `config/server.{toml,yaml,json}` (optional)
    /// 2. `TECHWISER_*` variables, `__` between nested keys
    ///    (e.g. `TECHWISER_GITHUB__CLIENT_ID`)
    ///
    /// The conventional `GEMINI_API_KEY`, `GITHUB_CLIENT_ID` and
    /// `GITHUB_CLIENT_SECRET` variables fill in anything still unset.
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/server").required(false))
            .add_source(Self::environment_source())
            .build();

        let mut config: ServerConfig = match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))?,
            Err(e) => {
                tracing::info!("No usable config sources ({}), using default configuration", e);
                Self::default()
            }
        };

        config.apply_conventional_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// `TECHWISER_*` environment source
    pub fn environment_source() -> config::Environment {
        config::Environment::with_prefix("TECHWISER")
            .prefix_separator("_")
            .separator("__")
    }

    /// Fill unset secrets from the conventional variable names
    pub fn apply_conventional_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.gemini_api_key.is_none() {
            self.gemini_api_key = non_blank("GEMINI_API_KEY");
        }
        if self.github.client_id.is_none() {
            self.github.client_id = non_blank("GITHUB_CLIENT_ID");
        }
        if self.github.client_secret.is_none() {
            self.github.client_secret = non_blank("GITHUB_CLIENT_SECRET");
        }
    }

    /// Check the configuration for obvious mistakes
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_model.trim().is_empty() {
            anyhow::bail!("default_model must not be empty");
        }
        if self.llm.request_timeout_secs == 0 {
            anyhow::bail!("llm.request_timeout_secs must be greater than zero");
        }
        self.repository
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid repository configuration: {}", e))?;
        Ok(())
    }

    /// Address to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the provider router
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            gemini_base_url: self.llm.gemini_base_url.clone(),
            openrouter_base_url: self.llm.openrouter_base_url.clone(),
            server_gemini_key: self.gemini_api_key.clone(),
            referer: self.public_url.clone(),
            request_timeout: Duration::from_secs(self.llm.request_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_model, "gemini-2.5-flash");
        assert_eq!(config.log_level, "info");
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.github.oauth_base_url, "https://github.com");
        assert_eq!(config.llm.request_timeout_secs, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = ServerConfig::default();
        config.gemini_api_key = Some("AIza-secret".to_string());
        config.github.client_secret = Some("gh-secret".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("AIza-secret"));
        assert!(!debug.contains("gh-secret"));
    }

    #[test]
    fn test_conventional_env_fills_gaps_only() {
        let mut config = ServerConfig::default();
        config.github.client_id = Some("from-config".to_string());

        config.apply_conventional_env(|name| match name {
            "GEMINI_API_KEY" => Some("env-key".to_string()),
            "GITHUB_CLIENT_ID" => Some("from-env".to_string()),
            "GITHUB_CLIENT_SECRET" => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.gemini_api_key.as_deref(), Some("env-key"));
        assert_eq!(config.github.client_id.as_deref(), Some("from-config"));
        assert!(config.github.client_secret.is_none());
    }

    #[test]
    fn test_provider_settings() {
        let mut config = ServerConfig::default();
        config.public_url = "https://techwiser.app".to_string();
        config.llm.request_timeout_secs = 30;

        let settings = config.provider_settings();
        assert_eq!(settings.referer, "https://techwiser.app");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }
}
