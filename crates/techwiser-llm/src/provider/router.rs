//! Provider selection by model id and key resolution

use crate::catalog::is_builtin_gemini_model;
use crate::error::{LLMError, Result};
use crate::provider::{GeminiProvider, LLMProvider, OpenRouterProvider};
use crate::provider::{DEFAULT_REFERER, GEMINI_BASE_URL, OPENROUTER_BASE_URL};
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Which upstream API serves a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Google Gemini REST API, called directly
    Gemini,
    /// OpenRouter multi-model proxy
    OpenRouter,
}

impl ProviderKind {
    /// Pick the provider for a model id.
    ///
    /// Built-in Gemini catalogue entries and bare `gemini*` ids go to Gemini;
    /// vendor-prefixed ids (`vendor/model`) go to OpenRouter.
    pub fn for_model(model: &str) -> Self {
        let model = model.trim();
        if is_builtin_gemini_model(model) || (!model.contains('/') && model.starts_with("gemini")) {
            ProviderKind::Gemini
        } else {
            ProviderKind::OpenRouter
        }
    }

    /// Human-readable provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenRouter => "OpenRouter",
        }
    }
}

/// Caller-supplied API keys
#[derive(Clone, Default)]
pub struct ApiKeys {
    /// Custom Gemini key that overrides the server's key
    pub gemini_override: Option<String>,
    /// OpenRouter key; the server holds none of its own
    pub openrouter: Option<String>,
}

impl ApiKeys {
    /// Keys with blank values treated as absent
    pub fn new(gemini_override: Option<String>, openrouter: Option<String>) -> Self {
        Self {
            gemini_override: non_blank(gemini_override),
            openrouter: non_blank(openrouter),
        }
    }
}

// Keys must never reach the logs.
impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("gemini_override", &self.gemini_override.as_ref().map(|_| "<redacted>"))
            .field("openrouter", &self.openrouter.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Settings shared by every provider the router builds
#[derive(Clone)]
pub struct ProviderSettings {
    pub gemini_base_url: String,
    pub openrouter_base_url: String,
    /// Server-side Gemini key used when the caller brings none
    pub server_gemini_key: Option<String>,
    /// Public URL of this deployment, sent to OpenRouter as referer
    pub referer: String,
    pub request_timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            openrouter_base_url: OPENROUTER_BASE_URL.to_string(),
            server_gemini_key: None,
            referer: DEFAULT_REFERER.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("gemini_base_url", &self.gemini_base_url)
            .field("openrouter_base_url", &self.openrouter_base_url)
            .field("server_gemini_key", &self.server_gemini_key.as_ref().map(|_| "<redacted>"))
            .field("referer", &self.referer)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Seam between the app generator and concrete providers
pub trait ProviderResolver: Send + Sync {
    /// Return a provider able to serve `model` with the given keys
    fn resolve(&self, model: &str, keys: &ApiKeys) -> Result<Arc<dyn LLMProvider>>;
}

/// Builds Gemini or OpenRouter providers on demand
pub struct ProviderRouter {
    settings: ProviderSettings,
    client: Client,
}

impl ProviderRouter {
    /// Create a router with a shared HTTP client
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| {
                LLMError::InvalidConfiguration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { settings, client })
    }

    /// Provider settings in use
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }
}

impl ProviderResolver for ProviderRouter {
    fn resolve(&self, model: &str, keys: &ApiKeys) -> Result<Arc<dyn LLMProvider>> {
        match ProviderKind::for_model(model) {
            ProviderKind::Gemini => {
                let key = non_blank(keys.gemini_override.clone())
                    .or_else(|| non_blank(self.settings.server_gemini_key.clone()))
                    .ok_or_else(|| LLMError::MissingApiKey {
                        provider: "Gemini".to_string(),
                    })?;

                Ok(Arc::new(
                    GeminiProvider::with_base_url(key, self.settings.gemini_base_url.clone())
                        .with_client(self.client.clone()),
                ))
            }
            ProviderKind::OpenRouter => {
                let key = non_blank(keys.openrouter.clone()).ok_or_else(|| {
                    LLMError::MissingApiKey {
                        provider: "OpenRouter".to_string(),
                    }
                })?;

                Ok(Arc::new(
                    OpenRouterProvider::with_base_url(key, self.settings.openrouter_base_url.clone())
                        .with_referer(self.settings.referer.clone())
                        .with_client(self.client.clone()),
                ))
            }
        }
    }
}

/// Resolver that always hands out the same provider
pub struct StaticResolver {
    provider: Arc<dyn LLMProvider>,
}

impl StaticResolver {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }
}

impl ProviderResolver for StaticResolver {
    fn resolve(&self, _model: &str, _keys: &ApiKeys) -> Result<Arc<dyn LLMProvider>> {
        Ok(self.provider.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_for_model() {
        assert_eq!(ProviderKind::for_model("gemini-2.5-flash"), ProviderKind::Gemini);
        assert_eq!(ProviderKind::for_model("gemini-3.1-pro-preview"), ProviderKind::Gemini);
        assert_eq!(
            ProviderKind::for_model("stepfun/step-3.5-flash:free"),
            ProviderKind::OpenRouter
        );
        assert_eq!(
            ProviderKind::for_model("google/gemini-2.5-pro"),
            ProviderKind::OpenRouter
        );
        assert_eq!(ProviderKind::for_model("gpt-4o"), ProviderKind::OpenRouter);
    }

    #[test]
    fn test_blank_keys_are_absent() {
        let keys = ApiKeys::new(Some("   ".to_string()), Some(String::new()));
        assert!(keys.gemini_override.is_none());
        assert!(keys.openrouter.is_none());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let keys = ApiKeys::new(Some("secret-gemini".to_string()), Some("secret-or".to_string()));
        let debug = format!("{:?}", keys);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_resolve_gemini_with_server_key() {
        let router = ProviderRouter::new(ProviderSettings {
            server_gemini_key: Some("server-key".to_string()),
            ..Default::default()
        })
        .unwrap();

        let provider = router
            .resolve("gemini-2.5-flash", &ApiKeys::default())
            .unwrap();
        assert_eq!(provider.provider_name(), "Gemini");
    }

    #[test]
    fn test_resolve_gemini_without_any_key() {
        let router = ProviderRouter::new(ProviderSettings::default()).unwrap();
        let err = router
            .resolve("gemini-2.5-flash", &ApiKeys::default())
            .err()
            .unwrap();
        assert!(matches!(err, LLMError::MissingApiKey { ref provider } if provider == "Gemini"));
    }

    #[test]
    fn test_resolve_openrouter_requires_caller_key() {
        let router = ProviderRouter::new(ProviderSettings {
            server_gemini_key: Some("server-key".to_string()),
            ..Default::default()
        })
        .unwrap();

        let err = router
            .resolve("arcee-ai/trinity-large-preview:free", &ApiKeys::default())
            .err()
            .unwrap();
        assert!(matches!(err, LLMError::MissingApiKey { ref provider } if provider == "OpenRouter"));

        let keys = ApiKeys::new(None, Some("or-key".to_string()));
        let provider = router
            .resolve("arcee-ai/trinity-large-preview:free", &keys)
            .unwrap();
        assert_eq!(provider.provider_name(), "OpenRouter");
    }

    #[test]
    fn test_resolve_ignores_blank_keys_built_by_hand() {
        let router = ProviderRouter::new(ProviderSettings::default()).unwrap();
        let keys = ApiKeys {
            gemini_override: Some("   ".to_string()),
            openrouter: Some("\t".to_string()),
        };

        let err = router.resolve("gemini-2.5-flash", &keys).err().unwrap();
        assert!(matches!(err, LLMError::MissingApiKey { ref provider } if provider == "Gemini"));

        let err = router.resolve("a/b", &keys).err().unwrap();
        assert!(matches!(err, LLMError::MissingApiKey { ref provider } if provider == "OpenRouter"));
    }

    #[test]
    fn test_default_referer_matches_provider() {
        assert_eq!(ProviderSettings::default().referer, DEFAULT_REFERER);
    }
}
