//! App generation from natural language prompts

use crate::client::LLMRequest;
use crate::error::{LLMError, Result};
use crate::generator::json_extractor::extract_generation;
use crate::generator::prompt_templates::{generation_schema, APP_SYSTEM_PROMPT};
use crate::provider::{ApiKeys, ProviderResolver};
use std::sync::Arc;
use techwiser_core::{ChatMessage, GenerationResult};
use tracing::{info, warn};

/// Model used when the caller names none
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for app generation
#[derive(Debug, Clone)]
pub struct AppGeneratorConfig {
    /// Model used when a request does not pick one
    pub default_model: String,
    /// Maximum tokens for response
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for AppGeneratorConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: Some(0.7),
        }
    }
}

impl AppGeneratorConfig {
    /// Create a new configuration with a specific default model
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            default_model: default_model.into(),
            ..Default::default()
        }
    }

    /// Set maximum tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Model id; the configured default when `None` or blank
    pub model: Option<String>,
    /// Caller-supplied API keys
    pub keys: ApiKeys,
}

impl GenerateOptions {
    pub fn new(model: Option<String>, keys: ApiKeys) -> Self {
        Self { model, keys }
    }
}

/// App generator using LLM
pub struct AppGenerator {
    resolver: Arc<dyn ProviderResolver>,
    config: AppGeneratorConfig,
}

impl AppGenerator {
    /// Create a new app generator
    pub fn new(resolver: Arc<dyn ProviderResolver>, config: AppGeneratorConfig) -> Self {
        Self { resolver, config }
    }

    /// Create with default configuration
    pub fn with_defaults(resolver: Arc<dyn ProviderResolver>) -> Self {
        Self::new(resolver, AppGeneratorConfig::default())
    }

    /// Generator configuration
    pub fn config(&self) -> &AppGeneratorConfig {
        &self.config
    }

    /// Model id a call with `options` would use
    pub fn model_for(&self, options: &GenerateOptions) -> String {
        options
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.config.default_model)
            .to_string()
    }

    /// Generate app files for `prompt`, continuing the conversation in `history`
    ///
    /// # Returns
    /// * `Ok(GenerationResult)` - At least one file plus a description
    /// * `Err(LLMError)` - Provider selection, the upstream call, or parsing failed
    pub async fn generate(
        &self,
        prompt: &str,
        history: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<GenerationResult> {
        let model = self.model_for(options);
        let provider = self.resolver.resolve(&model, &options.keys)?;

        let mut request = LLMRequest::new(prompt.to_string(), model.clone())
            .with_system(APP_SYSTEM_PROMPT.to_string())
            .with_history(history.to_vec())
            .with_json_output(Some(generation_schema()));
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }

        info!(
            provider = provider.provider_name(),
            model = %model,
            history = history.len(),
            "generating app"
        );

        let response = provider.call(request).await?;

        let result = extract_generation(&response.content).map_err(|e| {
            warn!(model = %model, "failed to parse AI response: {}", e);
            e
        })?;

        if result.is_empty() {
            return Err(LLMError::InvalidResponse(
                "The AI response contained no files".to_string(),
            ));
        }

        info!(
            model = %model,
            files = result.files.len(),
            tokens = response.tokens_used,
            "app generated"
        );

        Ok(result)
    }
}
