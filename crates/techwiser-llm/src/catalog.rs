//! Model catalogue: built-in Gemini models plus featured OpenRouter models
//!
//! The OpenRouter list is fetched from the public `/models` endpoint, trimmed
//! to a handful of featured coding-capable models and cached in memory. When
//! the endpoint is unreachable a static fallback list is served instead.

use crate::error::{LLMError, Result};
use crate::provider::OPENROUTER_BASE_URL;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// How long a fetched OpenRouter model list stays fresh
pub const CATALOG_TTL: Duration = Duration::from_secs(10 * 60);

/// OpenRouter models surfaced in the model picker
pub const FEATURED_MODEL_IDS: [&str; 3] = [
    "stepfun/step-3.5-flash:free",
    "arcee-ai/trinity-large-preview:free",
    "nvidia/nemotron-3-nano-30b-a3b:free",
];

/// Per-token prices as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub prompt: String,
    pub completion: String,
}

/// A selectable model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub context_length: u64,
    pub pricing: ModelPricing,
    pub provider: String,
    /// Served directly by the Gemini API rather than OpenRouter
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_gemini: bool,
}

impl ModelInfo {
    fn free(id: &str, name: &str, description: &str, provider: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            context_length: 8192,
            pricing: ModelPricing {
                prompt: "0".to_string(),
                completion: "0".to_string(),
            },
            provider: provider.to_string(),
            is_gemini: false,
        }
    }
}

/// Models served by the Gemini API directly
pub fn gemini_models() -> Vec<ModelInfo> {
    vec![ModelInfo {
        id: "gemini-2.5-flash".to_string(),
        name: "Gemini 2.5 Flash".to_string(),
        description: "Fast, efficient model ideal for quick code generation and iteration. Great balance of speed and quality.".to_string(),
        context_length: 1_048_576,
        pricing: ModelPricing {
            prompt: "Free tier available".to_string(),
            completion: "Free tier available".to_string(),
        },
        provider: "Google".to_string(),
        is_gemini: true,
    }]
}

/// Whether `id` names one of the built-in Gemini models
pub fn is_builtin_gemini_model(id: &str) -> bool {
    gemini_models().iter().any(|m| m.id == id)
}

/// Served when OpenRouter cannot be reached
pub fn fallback_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo::free(
            "stepfun/step-3.5-flash:free",
            "StepFun 3.5 Flash",
            "Fast free model from StepFun.",
            "StepFun",
        ),
        ModelInfo::free(
            "arcee-ai/trinity-large-preview:free",
            "Trinity Large Preview",
            "Free preview model by Arcee AI.",
            "Arcee AI",
        ),
        ModelInfo::free(
            "nvidia/nemotron-3-nano-30b-a3b:free",
            "Nemotron 3 Nano",
            "Nvidia lightweight model.",
            "Nvidia",
        ),
    ]
}

/// Raw model entry from `GET /models`
#[derive(Debug, Deserialize)]
struct ApiModel {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    context_length: Option<u64>,
    #[serde(default)]
    pricing: Option<ApiPricing>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPricing {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    completion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiModelList {
    #[serde(default)]
    data: Vec<ApiModel>,
}

fn is_featured(id: &str) -> bool {
    FEATURED_MODEL_IDS.contains(&id)
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl From<ApiModel> for ModelInfo {
    fn from(m: ApiModel) -> Self {
        let vendor = m.id.split('/').next().unwrap_or("Unknown");
        let vendor = if vendor.is_empty() { "Unknown" } else { vendor };
        let pricing = m.pricing.unwrap_or_default();

        ModelInfo {
            name: non_empty_or(m.name, &m.id),
            description: non_empty_or(m.description, "No description available."),
            context_length: m.context_length.unwrap_or(0),
            pricing: ModelPricing {
                prompt: non_empty_or(pricing.prompt, "0"),
                completion: non_empty_or(pricing.completion, "0"),
            },
            provider: format_provider(vendor),
            is_gemini: false,
            id: m.id,
        }
    }
}

fn featured_first(a: &ModelInfo, b: &ModelInfo) -> Ordering {
    match (is_featured(&a.id), is_featured(&b.id)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

struct CachedList {
    models: Vec<ModelInfo>,
    fetched_at: Instant,
}

/// Cached view over the OpenRouter model list
pub struct ModelCatalog {
    client: Client,
    base_url: String,
    ttl: Duration,
    cache: RwLock<Option<CachedList>>,
}

impl ModelCatalog {
    /// Catalogue backed by the public OpenRouter endpoint
    pub fn new() -> Self {
        Self::with_base_url(OPENROUTER_BASE_URL)
    }

    /// Catalogue backed by a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ttl: CATALOG_TTL,
            cache: RwLock::new(None),
        }
    }

    /// Override the cache lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Featured OpenRouter models, cached for the TTL.
    ///
    /// Never fails: fetch errors are logged and the fallback list returned
    /// (the fallback is not cached, so the next call retries).
    pub async fn openrouter_models(&self) -> Vec<ModelInfo> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    debug!("serving OpenRouter models from cache");
                    return cached.models.clone();
                }
            }
        }

        match self.fetch().await {
            Ok(models) => {
                let mut cache = self.cache.write().await;
                *cache = Some(CachedList {
                    models: models.clone(),
                    fetched_at: Instant::now(),
                });
                models
            }
            Err(e) => {
                warn!("Failed to fetch OpenRouter models: {}", e);
                fallback_models()
            }
        }
    }

    /// Drop the cached list
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn fetch(&self) -> Result<Vec<ModelInfo>> {
        let resp = self
            .client
            .get(format!("{}/models", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LLMError::ApiCallFailed(format!(
                "OpenRouter API error: {}",
                status
            )));
        }

        let list: ApiModelList = resp.json().await?;

        let mut models: Vec<ModelInfo> = list
            .data
            .into_iter()
            .filter(|m| is_featured(&m.id))
            .map(ModelInfo::from)
            .collect();
        models.sort_by(featured_first);

        Ok(models)
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Display name for a vendor prefix ("meta-llama" -> "Meta")
pub fn format_provider(raw: &str) -> String {
    match raw {
        "anthropic" => "Anthropic".to_string(),
        "openai" => "OpenAI".to_string(),
        "google" => "Google".to_string(),
        "deepseek" => "DeepSeek".to_string(),
        "meta-llama" => "Meta".to_string(),
        "mistralai" => "Mistral".to_string(),
        "qwen" => "Qwen".to_string(),
        "cohere" => "Cohere".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}

/// Render a per-token price as a per-million-token label
pub fn format_pricing(price_per_token: &str) -> String {
    let price = match price_per_token.trim().parse::<f64>() {
        Ok(p) if p.is_finite() && p != 0.0 => p,
        _ => return "Free".to_string(),
    };

    let per_million = price * 1_000_000.0;
    if per_million < 0.01 {
        "<$0.01/M".to_string()
    } else {
        format!("${:.2}/M", per_million)
    }
}

/// Render a context window size ("1.0M", "128K", "512")
pub fn format_context_length(length: u64) -> String {
    if length >= 1_000_000 {
        format!("{:.1}M", length as f64 / 1_000_000.0)
    } else if length >= 1_000 {
        format!("{}K", (length as f64 / 1_000.0).round() as u64)
    } else {
        length.to_string()
    }
}
