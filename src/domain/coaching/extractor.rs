//! Structured-data extraction from free-form model output.
//!
//! Models wrap their JSON in prose, code fences, or nothing at all. The
//! extractor is permissive about where the object sits and leaves every
//! schema decision to the normalizer.

use serde_json::{Map, Value};
use thiserror::Error;

/// Key/value object recovered from model output.
pub type ExtractedObject = Map<String, Value>;

/// Why no object could be recovered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no structured object in output")]
    NoObject,

    #[error("JSON parse error: {0}")]
    ParseError(String),
}

/// Locates and parses the structured object embedded in model output.
#[derive(Debug, Clone, Default)]
pub struct StructuredExtractor;

impl StructuredExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns the parsed object, or `None` when the text holds no parseable
    /// object. Never fails.
    pub fn extract(&self, text: &str) -> Option<ExtractedObject> {
        self.try_extract(text).ok()
    }

    /// Like [`extract`](Self::extract) but reports why nothing was found.
    ///
    /// The candidate span runs from the first `{` to the last `}` in the
    /// text, across line breaks.
    pub fn try_extract(&self, text: &str) -> Result<ExtractedObject, ExtractionError> {
        let span = Self::candidate_span(text).ok_or(ExtractionError::NoObject)?;
        serde_json::from_str::<ExtractedObject>(span)
            .map_err(|e| ExtractionError::ParseError(e.to_string()))
    }

    fn candidate_span(text: &str) -> Option<&str> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end < start {
            return None;
        }
        Some(&text[start..=end])
    }
}
