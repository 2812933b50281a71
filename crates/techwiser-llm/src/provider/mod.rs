//! LLM provider implementations

use crate::client::LLMClient;

/// LLM provider trait
pub trait LLMProvider: LLMClient {
    /// Get the provider name
    fn provider_name(&self) -> &str;
}

// Re-export all providers
mod gemini;
mod mock;
mod openrouter;
mod router;

pub use gemini::{GeminiProvider, GEMINI_BASE_URL};
pub use mock::MockProvider;
pub use openrouter::{OpenRouterProvider, DEFAULT_REFERER, OPENROUTER_BASE_URL};
pub use router::{ApiKeys, ProviderKind, ProviderResolver, ProviderRouter, ProviderSettings, StaticResolver};
