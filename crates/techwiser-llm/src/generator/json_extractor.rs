//! JSON extraction utilities for cleaning LLM responses

use crate::error::{LLMError, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use techwiser_core::{GeneratedFile, GenerationResult};
use tracing::debug;

fn json_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json[ \t]*\r?\n?(.*?)```").expect("valid fence pattern"))
}

fn any_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("valid fence pattern")
    })
}

/// Extracts a generation result from a model response
///
/// Models asked for JSON do not always comply. Candidates are tried in order:
/// - the whole response
/// - the first ```` ```json ```` block, then the first fenced block of any kind
/// - everything from the first `{` to the last `}`
///
/// # Returns
/// * `Ok(GenerationResult)` - The first candidate with the expected shape
/// * `Err(LLMError::InvalidResponse)` - If no candidate parses
pub fn extract_generation(llm_output: &str) -> Result<GenerationResult> {
    let cleaned = llm_output.trim();
    if cleaned.is_empty() {
        return Err(LLMError::InvalidResponse("No response from AI".to_string()));
    }

    if let Some(result) = parse_candidate(cleaned) {
        return Ok(result);
    }

    for fence in [json_fence(), any_fence()] {
        if let Some(body) = fence.captures(cleaned).and_then(|c| c.get(1)) {
            if let Some(result) = parse_candidate(body.as_str().trim()) {
                debug!("recovered generation result from fenced block");
                return Ok(result);
            }
        }
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Some(result) = parse_candidate(&cleaned[start..=end]) {
                debug!("recovered generation result from embedded object");
                return Ok(result);
            }
        }
    }

    Err(LLMError::InvalidResponse(
        "The AI returned an invalid response format. Please try again.".to_string(),
    ))
}

/// Parse one candidate into the generation shape
fn parse_candidate(candidate: &str) -> Option<GenerationResult> {
    let value: Value = serde_json::from_str(candidate).ok()?;

    let mut result = match value {
        Value::Object(_) => {
            if !value.get("files").map(Value::is_array).unwrap_or(false) {
                return None;
            }
            serde_json::from_value::<GenerationResult>(value).ok()?
        }
        Value::Array(_) => {
            let files = serde_json::from_value::<Vec<GeneratedFile>>(value).ok()?;
            GenerationResult::new(files, "")
        }
        _ => return None,
    };

    result.files.retain(|f| !f.path.trim().is_empty());
    Some(result)
}
