//! Prompt templates for app generation

use serde_json::{json, Value};

/// System instruction sent with every generation request
pub const APP_SYSTEM_PROMPT: &str = r#"You are TechWiser, an expert AI Full-Stack Engineer and UI/UX Designer.
Your task is to generate high-quality, production-ready React code using Tailwind CSS.

CORE PRINCIPLES:
1. LOVABLE UI: Design interfaces that feel "crafted," not just "coded." Use beautiful typography (Inter, Space Grotesk), subtle gradients, glassmorphism, and smooth animations.
2. MULTI-LANGUAGE: If the user prompt starts with a language instruction like "[Respond in Hindi]", you MUST ensure that all user-facing text (titles, descriptions, button labels, placeholders) in the generated application is in that language. The code itself (variable names, logic) should remain in English.
3. MOBILE FIRST: Every app must be fully responsive and feel like a native mobile app on small screens (touch-friendly targets, bottom navigation where appropriate).
4. MODERN STACK: Use React 19, Tailwind CSS v4, and Lucide React icons.
5. COMPONENT STRUCTURE: Organize code into logical components. Always include a main App.tsx that assembles the UI.
6. Use 'lucide-react' for all icons.
7. Use 'motion/react' for all animations.

Respond with JSON only. The JSON structure must be:
{
  "files": [
    { "path": "App.tsx", "content": "..." },
    { "path": "components/Button.tsx", "content": "..." }
  ],
  "description": "Brief explanation of what was built"
}"#;

/// Structured-output schema for `{files: [{path, content}], description}`.
///
/// Uses the Gemini schema dialect (upper-case type names); OpenRouter only
/// receives the JSON-object response format.
pub fn generation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "files": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "path": {"type": "STRING"},
                        "content": {"type": "STRING"}
                    },
                    "required": ["path", "content"]
                }
            },
            "description": {"type": "STRING"}
        },
        "required": ["files", "description"]
    })
}
