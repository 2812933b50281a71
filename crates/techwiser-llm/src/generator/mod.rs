//! App generation from natural language prompts
//!
//! # Example
//! ```no_run
//! use techwiser_llm::{AppGenerator, GenerateOptions, ProviderRouter, ProviderSettings};
//! use std::sync::Arc;
//!
//! # async fn example() -> techwiser_llm::Result<()> {
//! let router = ProviderRouter::new(ProviderSettings {
//!     server_gemini_key: Some("your-api-key".to_string()),
//!     ..Default::default()
//! })?;
//! let generator = AppGenerator::with_defaults(Arc::new(router));
//!
//! let result = generator
//!     .generate("A pomodoro timer with a dark theme", &[], &GenerateOptions::default())
//!     .await?;
//!
//! println!("{} files: {}", result.files.len(), result.description);
//! # Ok(())
//! # }
//! ```

pub mod app_generator;
pub mod json_extractor;
pub mod prompt_templates;

pub use app_generator::{AppGenerator, AppGeneratorConfig, GenerateOptions, DEFAULT_MODEL};
pub use json_extractor::extract_generation;
pub use prompt_templates::{generation_schema, APP_SYSTEM_PROMPT};
