//! Google Gemini provider implementation

use crate::client::{LLMClient, LLMRequest, LLMResponse};
use crate::error::{classify_api_error, LLMError, Result};
use crate::provider::LLMProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use techwiser_core::ChatRole;
use tracing::debug;

/// Default Gemini REST endpoint
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini provider
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_BASE_URL.to_string())
    }

    /// Create with custom base URL (e.g., for a proxy or a test server)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Reuse an existing HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Build the `generateContent` request body.
    ///
    /// History turns are replayed as-is; the system instruction travels inside
    /// the final user turn.
    pub(crate) fn build_body(request: &LLMRequest) -> Value {
        let mut contents: Vec<Value> = request
            .history
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                json!({
                    "role": role,
                    "parts": [{"text": msg.content}]
                })
            })
            .collect();

        let final_text = match &request.system {
            Some(system) => format!("System: {}\n\nUser Request: {}", system, request.prompt),
            None => request.prompt.clone(),
        };
        contents.push(json!({
            "role": "user",
            "parts": [{"text": final_text}]
        }));

        let mut body = json!({
            "contents": contents,
        });

        let mut generation_config = serde_json::Map::new();
        if request.json_mode {
            generation_config.insert("responseMimeType".to_string(), json!("application/json"));
            if let Some(schema) = &request.json_schema {
                generation_config.insert("responseSchema".to_string(), schema.clone());
            }
        }
        if let Some(max_tokens) = request.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if let Some(temperature) = request.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }

        body
    }
}

#[async_trait]
impl LLMClient for GeminiProvider {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse> {
        let body = Self::build_body(&request);
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        debug!(
            model = %request.model,
            history = request.history.len(),
            "calling Gemini generateContent"
        );

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LLMError::ApiCallFailed(format!("Gemini API call failed: {}", e)))?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(|e| {
            LLMError::ApiCallFailed(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(classify_api_error("Gemini", status.as_u16(), &resp_text));
        }

        let resp_json: Value = serde_json::from_str(&resp_text).map_err(|e| {
            LLMError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(reason) = resp_json["promptFeedback"]["blockReason"].as_str() {
            return Err(LLMError::InvalidResponse(format!(
                "Prompt was blocked by Gemini: {}",
                reason
            )));
        }

        let parts = resp_json["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| LLMError::InvalidResponse("No response from AI".to_string()))?;

        let content: String = parts
            .iter()
            .filter(|part| !part["thought"].as_bool().unwrap_or(false))
            .filter_map(|part| part["text"].as_str())
            .collect();

        if content.trim().is_empty() {
            return Err(LLMError::InvalidResponse("No response from AI".to_string()));
        }

        let finish_reason = resp_json["candidates"][0]["finishReason"]
            .as_str()
            .unwrap_or("STOP")
            .to_string();

        let tokens_used = resp_json["usageMetadata"]["totalTokenCount"]
            .as_u64()
            .unwrap_or(0) as u32;

        Ok(LLMResponse::new(content, request.model.clone())
            .with_tokens(tokens_used)
            .with_finish_reason(finish_reason))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

impl LLMProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "Gemini"
    }
}
