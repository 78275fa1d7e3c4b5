//! Mock Text Generator for testing.
//!
//! Provides a configurable mock implementation of the TextGenerator port,
//! allowing tests to run without a real model server.
//!
//! # Features
//!
//! - Pre-configured generations
//! - Simulated delays for timeout testing
//! - Error injection for fallback testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_response(r#"{"should_intervene": false}"#)
//!     .with_delay(Duration::from_millis(100));
//!
//! let generation = generator.generate(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{Generation, GenerationError, GenerationRequest, GeneratorInfo, TextGenerator};

/// Mock text generator for testing.
///
/// Configurable to return specific text, simulate delays, or inject errors.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Generator info to return.
    info: GeneratorInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text as the generation.
    Success(String),
    /// Return an error.
    Error(MockError),
    /// Panic inside the call.
    Panic(String),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate a refused connection.
    Network { message: String },
    /// Simulate the transport-level timeout.
    Timeout { timeout: Duration },
    /// Simulate a non-success status.
    Status { status: u16, body: String },
}

impl From<MockError> for GenerationError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Network { message } => GenerationError::network(message),
            MockError::Timeout { timeout } => GenerationError::timeout(timeout),
            MockError::Status { status, body } => GenerationError::status(status, body),
        }
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextGenerator {
    /// Creates a new mock generator with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: GeneratorInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful generation to the queue.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockResponse::Success(text.into()))
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Adds a call that panics.
    pub fn with_panic(self, message: impl Into<String>) -> Self {
        self.push(MockResponse::Panic(message.into()))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this generator.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success(String::new()))
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GenerationError> {
        // Record the call
        self.calls.lock().unwrap().push(request);

        // Simulate delay
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success(text) => Ok(Generation::new(text, &self.info.model)),
            MockResponse::Error(err) => Err(err.into()),
            MockResponse::Panic(message) => panic!("{}", message),
        }
    }

    fn generator_info(&self) -> GeneratorInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request() -> GenerationRequest {
        GenerationRequest::new("Hello").with_trace_id("trace-123")
    }

    #[tokio::test]
    async fn mock_generator_returns_configured_text() {
        let generator = MockTextGenerator::new().with_response("  Hello from mock!\n");

        let generation = generator.generate(test_request()).await.unwrap();

        assert_eq!(generation.text, "Hello from mock!");
        assert_eq!(generation.model, "mock-model-1");
    }

    #[tokio::test]
    async fn mock_generator_returns_responses_in_order() {
        let generator = MockTextGenerator::new()
            .with_response("First")
            .with_response("Second");

        let r1 = generator.generate(test_request()).await.unwrap();
        let r2 = generator.generate(test_request()).await.unwrap();
        let r3 = generator.generate(test_request()).await.unwrap();

        assert_eq!(r1.text, "First");
        assert_eq!(r2.text, "Second");
        assert!(r3.is_empty());
    }

    #[tokio::test]
    async fn mock_generator_returns_configured_error() {
        let generator = MockTextGenerator::new().with_error(MockError::Status {
            status: 503,
            body: "loading model".to_string(),
        });

        let err = generator.generate(test_request()).await.unwrap_err();

        assert_eq!(err, GenerationError::status(503, "loading model"));
    }

    #[tokio::test]
    async fn mock_generator_tracks_calls() {
        let generator = MockTextGenerator::new();
        assert_eq!(generator.call_count(), 0);

        generator.generate(test_request()).await.unwrap();

        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.get_calls()[0].trace_id, "trace-123");
    }

    #[tokio::test]
    async fn mock_generator_respects_delay() {
        let generator = MockTextGenerator::new()
            .with_response("Delayed")
            .with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        generator.generate(test_request()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn mock_error_converts_to_generation_error() {
        let err: GenerationError = MockError::Timeout {
            timeout: Duration::from_secs(60),
        }
        .into();
        assert_eq!(err, GenerationError::timeout(Duration::from_secs(60)));

        let err: GenerationError = MockError::Network {
            message: "refused".to_string(),
        }
        .into();
        assert!(matches!(err, GenerationError::Network(_)));
    }
}
