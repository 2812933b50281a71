//! TechWiser LLM Integration
//!
//! This crate turns a natural-language app request into a bundle of source
//! files:
//! - Provider routing: Gemini directly, everything else through OpenRouter
//! - Prompting: the TechWiser system instruction and structured-output schema
//! - Response repair: lenient extraction of JSON from chatty model output
//! - Model catalogue: built-in and featured OpenRouter models

// Re-export core types
pub use client::{LLMClient, LLMRequest, LLMResponse};
pub use error::{classify_api_error, LLMError, Result};

// Re-export providers
pub use provider::{
    ApiKeys, GeminiProvider, LLMProvider, MockProvider, OpenRouterProvider, ProviderKind,
    ProviderResolver, ProviderRouter, ProviderSettings, StaticResolver, DEFAULT_REFERER,
};

// Re-export generators
pub use generator::{
    extract_generation, generation_schema, AppGenerator, AppGeneratorConfig, GenerateOptions,
    APP_SYSTEM_PROMPT, DEFAULT_MODEL,
};

pub use catalog::{
    fallback_models, format_context_length, format_pricing, format_provider, gemini_models,
    ModelCatalog, ModelInfo, ModelPricing, FEATURED_MODEL_IDS,
};

pub mod catalog;
pub mod client;
pub mod error;
pub mod generator;
pub mod provider;
