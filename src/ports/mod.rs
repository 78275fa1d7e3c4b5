//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerator` - Single-shot prompt completion by a language model

mod text_generator;

pub use text_generator::{
    Generation, GenerationError, GenerationRequest, GeneratorInfo, TextGenerator,
};
