//! Text generation adapters.
//!
//! - `OllamaProvider` - Local Ollama `/api/generate` endpoint
//! - `MockTextGenerator` - Configurable mock for testing

mod mock_provider;
mod ollama_provider;

pub use mock_provider::{MockError, MockResponse, MockTextGenerator};
pub use ollama_provider::{OllamaConfig, OllamaProvider, DEFAULT_GENERATE_URL, DEFAULT_MODEL};
