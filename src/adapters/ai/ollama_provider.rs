//! Ollama Provider - Implementation of TextGenerator for Ollama's generate API.
//!
//! Sends one non-streaming `POST /api/generate` per call and returns the
//! `response` field of the reply.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OllamaConfig::new()
//!     .with_model("mistral")
//!     .with_url("http://localhost:11434/api/generate")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let provider = OllamaProvider::new(config)?;
//! ```
//!
//! # Response handling
//!
//! A success status whose body has no string `response` field (or is not
//! JSON at all) counts as an empty generation. Only transport failures,
//! timeouts, and non-success statuses are errors.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ModelConfig;
use crate::ports::{Generation, GenerationError, GenerationRequest, GeneratorInfo, TextGenerator};

/// Default generate endpoint of a local Ollama server.
pub const DEFAULT_GENERATE_URL: &str = "http://localhost:11434/api/generate";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "mistral";

/// Configuration for the Ollama provider.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Model to use (e.g., "mistral", "llama3").
    pub model: String,
    /// Full URL of the generate endpoint.
    pub url: String,
    /// Wall-clock bound on a single call.
    pub timeout: Duration,
}

impl OllamaConfig {
    /// Creates a configuration with the default model and local endpoint.
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            url: DEFAULT_GENERATE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the endpoint URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ModelConfig> for OllamaConfig {
    fn from(config: &ModelConfig) -> Self {
        Self::new()
            .with_model(&config.name)
            .with_url(&config.url)
            .with_timeout(config.timeout())
    }
}

/// Ollama generate API provider.
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
}

impl OllamaProvider {
    /// Creates a provider with its own pooled HTTP client.
    pub fn new(config: OllamaConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Converts our request to Ollama's format.
    fn to_ollama_request<'a>(&'a self, request: &'a GenerationRequest) -> OllamaRequest<'a> {
        OllamaRequest {
            model: &self.config.model,
            prompt: &request.prompt,
            stream: false,
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::timeout(self.config.timeout)
        } else if e.is_connect() {
            GenerationError::network(format!("Connection failed: {}", e))
        } else {
            GenerationError::network(e.to_string())
        }
    }

    /// Sends the request.
    async fn send_request(&self, request: &GenerationRequest) -> Result<Response, GenerationError> {
        self.client
            .post(&self.config.url)
            .json(&self.to_ollama_request(request))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))
    }

    /// Checks the status and extracts the generation from the body.
    async fn parse_response(&self, response: Response) -> Result<Generation, GenerationError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(GenerationError::status(status.as_u16(), body));
        }

        Ok(Generation::new(
            generation_text(&body).unwrap_or_default(),
            &self.config.model,
        ))
    }
}

#[async_trait]
impl TextGenerator for OllamaProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GenerationError> {
        tracing::debug!(
            trace_id = %request.trace_id,
            model = %self.config.model,
            url = %self.config.url,
            prompt_chars = request.prompt.len(),
            "Calling text generation service"
        );

        let response = self.send_request(&request).await?;
        let generation = self.parse_response(response).await?;

        tracing::debug!(
            trace_id = %request.trace_id,
            output_chars = generation.text.len(),
            "Text generation finished"
        );
        Ok(generation)
    }

    fn generator_info(&self) -> GeneratorInfo {
        GeneratorInfo::new("ollama", &self.config.model)
    }
}

/// Pulls the `response` string out of a generate reply.
fn generation_text(body: &str) -> Option<String> {
    let parsed: OllamaResponse = serde_json::from_str(body).ok()?;
    parsed.response
}

// ════════════════════════════════════════════════════════════════════════════════
// Ollama API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default, deserialize_with = "string_or_none")]
    response: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}
