//! API module
//!
//! HTTP interface of the TechWiser backend.

pub mod rest;

pub use rest::{create_router, AppState};
