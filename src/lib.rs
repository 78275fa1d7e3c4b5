//! Conversational coaching service.
//!
//! Watches a two-person conversation and decides, via an external language
//! model, whether a short coaching intervention should be shown.
//!
//! # Architecture
//!
//! - `domain` - Pure advisory logic (windowing, heuristics, prompt, extraction, normalization)
//! - `ports` - Interface to the text generation backend
//! - `adapters` - Ollama client and HTTP surface
//! - `application` - Command handler orchestrating the pipeline
//! - `config` - Environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
