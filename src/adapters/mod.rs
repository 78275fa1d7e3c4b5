//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Text generation backends (Ollama, mock)
//! - `http` - Axum routes and static file serving

pub mod ai;
pub mod http;
