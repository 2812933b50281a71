//! Domain types shared across TechWiser crates

pub mod chat;
pub mod file;
pub mod language;

pub use chat::{ChatMessage, ChatRole};
pub use file::{GeneratedFile, GenerationResult};
pub use language::Language;
