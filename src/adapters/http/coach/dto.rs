//! HTTP DTOs for coaching endpoints.
//!
//! The advisory request and response contracts are already serde types in
//! the domain, so they are re-exported directly.

pub use crate::domain::coaching::{CoachRequest, CoachResponse, Turn};

use serde::Serialize;

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PingResponse {
    pub message: String,
}

impl PingResponse {
    pub fn pong() -> Self {
        Self {
            message: "pong".to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(path: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("No API route for {}", path),
        }
    }
}
