//! Maps loosely-typed model output onto the strict [`CoachResponse`] contract.
//!
//! Each field has a total coercion with an explicit default. A field that is
//! present but cannot be coerced fails the whole normalization; callers fall
//! back to [`CoachResponse::safe_default`] rather than keep the other fields.

use serde_json::Value;
use thiserror::Error;

use super::extractor::ExtractedObject;
use super::response::{CoachResponse, InterventionType};

/// Confidence used when the model omits the field.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Intervention type used when the model omits the field.
pub const DEFAULT_INTERVENTION: InterventionType = InterventionType::MicroCoach;

/// A present field that could not be coerced.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NormalizationError {
    #[error("confidence is not a finite number: {0}")]
    InvalidConfidence(Value),

    #[error("type is not a known intervention type: {0}")]
    UnknownType(Value),

    #[error("message is not a string: {0}")]
    InvalidMessage(Value),
}

/// Pure field-by-field coercion into [`CoachResponse`].
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalizes extracted data; `None` yields the safe default.
    pub fn normalize(
        &self,
        data: Option<&ExtractedObject>,
    ) -> Result<CoachResponse, NormalizationError> {
        let Some(data) = data else {
            return Ok(CoachResponse::safe_default());
        };

        let should_intervene = data.get("should_intervene").map(truthy).unwrap_or(false);
        let kind = coerce_type(data.get("type"))?;
        let message = coerce_message(data.get("message"))?;
        let confidence = coerce_confidence(data.get("confidence"))?;

        Ok(CoachResponse {
            should_intervene,
            kind,
            message,
            confidence,
        })
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "0" => false,
            _ => true,
        },
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn coerce_type(value: Option<&Value>) -> Result<InterventionType, NormalizationError> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_INTERVENTION),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| NormalizationError::UnknownType(Value::String(s.clone()))),
        Some(other) => Err(NormalizationError::UnknownType(other.clone())),
    }
}

fn coerce_message(value: Option<&Value>) -> Result<Option<String>, NormalizationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(NormalizationError::InvalidMessage(other.clone())),
    }
}

fn coerce_confidence(value: Option<&Value>) -> Result<f64, NormalizationError> {
    let number = match value {
        None => return Ok(DEFAULT_CONFIDENCE),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n.clamp(0.0, 1.0)),
        _ => Err(NormalizationError::InvalidConfidence(
            value.cloned().unwrap_or(Value::Null),
        )),
    }
}
