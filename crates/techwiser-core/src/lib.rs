//! TechWiser Core - shared types for the TechWiser app builder
//!
//! This crate provides the types passed between the generation client,
//! the persistence layer and the HTTP server:
//! - Generated files and generation results
//! - Chat history messages
//! - Response languages
//! - Export helpers (ZIP archive, plain-text bundle)

pub mod error;
pub mod export;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::{ChatMessage, ChatRole, GeneratedFile, GenerationResult, Language};
