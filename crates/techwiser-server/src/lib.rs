//! TechWiser HTTP Server Library
//!
//! Provides the REST API components for testing and reuse.

pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod github;
pub mod state;
