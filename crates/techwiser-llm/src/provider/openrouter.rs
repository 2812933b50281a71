//! OpenRouter provider implementation (OpenAI-compatible chat completions)

use crate::client::{LLMClient, LLMRequest, LLMResponse};
use crate::error::{classify_api_error, LLMError, Result};
use crate::provider::LLMProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use techwiser_core::ChatRole;
use tracing::debug;

/// Default OpenRouter API endpoint
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Referer sent when none is configured
pub const DEFAULT_REFERER: &str = "http://127.0.0.1:8080";

const APP_TITLE: &str = "TechWiser";

/// OpenRouter provider
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    referer: String,
    client: Client,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENROUTER_BASE_URL.to_string())
    }

    /// Create with custom base URL
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            referer: DEFAULT_REFERER.to_string(),
            client: Client::new(),
        }
    }

    /// Site URL reported to OpenRouter for attribution
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Reuse an existing HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub(crate) fn build_body(request: &LLMRequest) -> Value {
        let mut messages = Vec::with_capacity(request.history.len() + 2);

        if let Some(system) = &request.system {
            messages.push(json!({
                "role": "system",
                "content": system
            }));
        }

        for msg in &request.history {
            let role = match msg.role {
                ChatRole::User => "user",
                ChatRole::Model => "assistant",
            };
            messages.push(json!({
                "role": role,
                "content": msg.content
            }));
        }

        messages.push(json!({
            "role": "user",
            "content": request.prompt
        }));

        let mut body = json!({
            "model": request.model,
            "messages": messages,
        });

        if request.json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }
}

#[async_trait]
impl LLMClient for OpenRouterProvider {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse> {
        let body = Self::build_body(&request);

        debug!(
            model = %request.model,
            history = request.history.len(),
            "calling OpenRouter chat completions"
        );

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| LLMError::ApiCallFailed(format!("OpenRouter API call failed: {}", e)))?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(|e| {
            LLMError::ApiCallFailed(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(classify_api_error("OpenRouter", status.as_u16(), &resp_text));
        }

        let resp_json: Value = serde_json::from_str(&resp_text).map_err(|e| {
            LLMError::InvalidResponse(format!("Failed to parse OpenRouter response: {}", e))
        })?;

        // OpenRouter sometimes reports upstream failures inside a 200 body
        if resp_json.get("error").is_some() {
            let code = resp_json["error"]["code"]
                .as_u64()
                .and_then(|code| u16::try_from(code).ok())
                .unwrap_or(502);
            return Err(classify_api_error("OpenRouter", code, &resp_text));
        }

        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LLMError::InvalidResponse("No response from AI".to_string()))?
            .to_string();

        let finish_reason = resp_json["choices"][0]["finish_reason"]
            .as_str()
            .unwrap_or("stop")
            .to_string();

        let tokens_used = resp_json["usage"]["total_tokens"].as_u64().unwrap_or(0) as u32;

        Ok(LLMResponse::new(content, request.model.clone())
            .with_tokens(tokens_used)
            .with_finish_reason(finish_reason))
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}

impl LLMProvider for OpenRouterProvider {
    fn provider_name(&self) -> &str {
        "OpenRouter"
    }
}
