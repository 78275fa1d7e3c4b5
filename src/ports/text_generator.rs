//! Text Generator Port - Interface for the external language model.
//!
//! The coaching pipeline only needs one thing from a model: turn a prompt
//! into raw text. This port keeps the HTTP details of any particular
//! generation service out of the orchestration.
//!
//! # Design
//!
//! - Non-streaming; the full generation is returned at once
//! - A single attempt per call, no retries
//! - Transport, timeout, and status failures are distinct error variants so
//!   callers never mistake a failed call for an empty generation
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoGenerator;
//!
//! #[async_trait]
//! impl TextGenerator for EchoGenerator {
//!     async fn generate(&self, request: GenerationRequest) -> Result<Generation, GenerationError> {
//!         Ok(Generation::new(request.prompt, "echo"))
//!     }
//!
//!     fn generator_info(&self) -> GeneratorInfo {
//!         GeneratorInfo::new("echo", "echo")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Port for text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt, waiting for the complete result.
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GenerationError>;

    /// Get generator information (service name, model).
    fn generator_info(&self) -> GeneratorInfo;
}

/// Request for a single generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Complete prompt text.
    pub prompt: String,
    /// Trace ID for correlating logs.
    pub trace_id: String,
}

impl GenerationRequest {
    /// Creates a new generation request.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            trace_id: String::new(),
        }
    }

    /// Sets the trace ID.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }
}

/// Result of a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Generated text, trimmed. May be empty.
    pub text: String,
    /// Model that produced the text.
    pub model: String,
}

impl Generation {
    /// Creates a generation, trimming surrounding whitespace.
    pub fn new(text: impl AsRef<str>, model: impl Into<String>) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            model: model.into(),
        }
    }

    /// Returns true if the model produced no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Generator information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorInfo {
    /// Service name (e.g., "ollama").
    pub name: String,
    /// Model identifier (e.g., "mistral").
    pub model: String,
}

impl GeneratorInfo {
    /// Creates new generator info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Text generation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Connection refused, DNS failure, broken body, etc.
    #[error("network error: {0}")]
    Network(String),

    /// No complete response within the configured bound.
    #[error("request timed out after {timeout:?}")]
    Timeout {
        /// Configured timeout.
        timeout: Duration,
    },

    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
}

impl GenerationError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }

    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Short failure class for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Network(_) => "transport",
            GenerationError::Timeout { .. } => "timeout",
            GenerationError::Status { .. } => "protocol",
        }
    }
}
