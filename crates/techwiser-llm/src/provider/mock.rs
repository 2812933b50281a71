//! Mock LLM provider for testing

use crate::client::{LLMClient, LLMRequest, LLMResponse};
use crate::error::Result;
use crate::provider::LLMProvider;
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock LLM provider for testing
///
/// Returns a canned response and remembers the last request it received.
pub struct MockProvider {
    name: String,
    default_response: String,
    last_request: Mutex<Option<LLMRequest>>,
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self::with_response(
            r#"{"files": [{"path": "App.tsx", "content": "export default function App() { return null; }"}], "description": "Mock app"}"#
                .to_string(),
        )
    }

    /// Create with custom default response
    pub fn with_response(response: String) -> Self {
        Self {
            name: "mock".to_string(),
            default_response: response,
            last_request: Mutex::new(None),
        }
    }

    /// The most recent request passed to `call`
    pub fn last_request(&self) -> Option<LLMRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockProvider {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse> {
        let model = request.model.clone();
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request);
        }

        Ok(LLMResponse::new(self.default_response.clone(), model)
            .with_tokens(10)
            .with_finish_reason("stop".to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl LLMProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "Mock"
    }
}
