//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `coaching` - Conversation window, heuristic flags, prompt compilation,
//!   structured output extraction and response normalization

pub mod coaching;
