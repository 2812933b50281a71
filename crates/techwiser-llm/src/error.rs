//! Error types for the TechWiser generation client

use thiserror::Error;

/// Result type alias for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// LLM module errors
#[derive(Debug, Error)]
pub enum LLMError {
    /// No API key available for the selected provider
    #[error("{provider} API key is missing")]
    MissingApiKey { provider: String },

    /// Provider rejected the API key
    #[error("{provider} rejected the API key: {message}")]
    InvalidApiKey { provider: String, message: String },

    /// Provider quota or rate limit hit
    #[error("{provider} rate limit reached: {message}")]
    RateLimited { provider: String, message: String },

    /// Requested model does not exist or has no endpoint
    #[error("{provider} model unavailable: {message}")]
    ModelUnavailable { provider: String, message: String },

    /// External API call failed
    #[error("External API call failed: {0}")]
    ApiCallFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl LLMError {
    /// Message suitable for showing to the person who typed the prompt
    pub fn user_message(&self) -> String {
        match self {
            LLMError::MissingApiKey { provider } => format!(
                "{} API key is missing. Please add it in Settings or check your environment variables.",
                provider
            ),
            LLMError::InvalidApiKey { provider, .. } => format!(
                "Your {} API key was rejected. Please check it in Settings.",
                provider
            ),
            LLMError::RateLimited { provider, .. } => format!(
                "{} rate limit or quota exceeded. Please wait a moment and try again.",
                provider
            ),
            LLMError::ModelUnavailable { provider, .. } => format!(
                "The selected model is not available on {}. Please choose another model.",
                provider
            ),
            LLMError::InvalidResponse(_) | LLMError::SerializationError(_) => {
                "The AI returned an invalid response format. Please try again.".to_string()
            }
            LLMError::HttpError(_) | LLMError::ApiCallFailed(_) => {
                "Failed to generate project. Please try again.".to_string()
            }
            LLMError::InvalidConfiguration(msg) => msg.clone(),
        }
    }
}

/// Map a non-success provider response onto an error variant.
///
/// Status codes decide first; the body text is matched (case-insensitively)
/// for providers that wrap auth or quota failures in a 400 or 200.
pub fn classify_api_error(provider: &str, status: u16, body: &str) -> LLMError {
    let lowered = body.to_ascii_lowercase();
    let message = summarize_body(body);
    let provider = provider.to_string();

    let key_rejected = [
        "api key not valid",
        "invalid api key",
        "api_key_invalid",
        "unauthorized",
    ]
    .iter()
    .any(|needle| lowered.contains(needle));

    let throttled = ["quota", "resource_exhausted", "rate limit"]
        .iter()
        .any(|needle| lowered.contains(needle));

    let missing_model = ["not found", "no endpoints found"]
        .iter()
        .any(|needle| lowered.contains(needle));

    if status == 401 || status == 403 || key_rejected {
        LLMError::InvalidApiKey { provider, message }
    } else if status == 429 || throttled {
        LLMError::RateLimited { provider, message }
    } else if status == 404 || missing_model {
        LLMError::ModelUnavailable { provider, message }
    } else {
        LLMError::ApiCallFailed(format!("{} API error ({}): {}", provider, status, message))
    }
}

/// Pull `error.message` out of a JSON error body, falling back to the raw text
fn summarize_body(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value["error"]["message"].as_str() {
            return msg.to_string();
        }
        if let Some(msg) = value["error"].as_str() {
            return msg.to_string();
        }
    }
    body.trim().chars().take(500).collect()
}
