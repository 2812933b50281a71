//! LLM client interface and types

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use techwiser_core::ChatMessage;

/// Request to an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMRequest {
    /// The current user prompt
    pub prompt: String,

    /// Model identifier (e.g., "gemini-2.5-flash", "stepfun/step-3.5-flash:free")
    pub model: String,

    /// Earlier turns of the conversation, oldest first
    #[serde(default)]
    pub history: Vec<ChatMessage>,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0)
    pub temperature: Option<f32>,

    /// System message/instructions
    pub system: Option<String>,

    /// Ask the provider for a JSON-only response
    #[serde(default)]
    pub json_mode: bool,

    /// Response schema for providers that support structured output
    pub json_schema: Option<serde_json::Value>,
}

impl LLMRequest {
    /// Create a new LLM request
    pub fn new(prompt: String, model: String) -> Self {
        Self {
            prompt,
            model,
            history: Vec::new(),
            max_tokens: None,
            temperature: None,
            system: None,
            json_mode: false,
            json_schema: None,
        }
    }

    /// Set conversation history
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set system message
    pub fn with_system(mut self, system: String) -> Self {
        self.system = Some(system);
        self
    }

    /// Request JSON output, optionally constrained by a schema
    pub fn with_json_output(mut self, schema: Option<serde_json::Value>) -> Self {
        self.json_mode = true;
        self.json_schema = schema;
        self
    }
}

/// Response from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Number of tokens used
    pub tokens_used: u32,

    /// Finish reason (e.g., "stop", "length")
    pub finish_reason: String,
}

impl LLMResponse {
    /// Create a new LLM response
    pub fn new(content: String, model: String) -> Self {
        Self {
            content,
            model,
            tokens_used: 0,
            finish_reason: "stop".to_string(),
        }
    }

    /// Set tokens used
    pub fn with_tokens(mut self, tokens: u32) -> Self {
        self.tokens_used = tokens;
        self
    }

    /// Set finish reason
    pub fn with_finish_reason(mut self, reason: String) -> Self {
        self.finish_reason = reason;
        self
    }
}

/// Async LLM client trait
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Call the LLM with a request for text generation
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse>;

    /// Get the name of this client
    fn name(&self) -> &str;
}
