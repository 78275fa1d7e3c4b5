//! GetAdviceHandler - Decide whether to surface a coaching intervention
//!
//! Runs the advisory pipeline (window, prompt, model call, extraction,
//! normalization) and collapses every failure into the safe default
//! response. Callers always get exactly one [`CoachResponse`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use thiserror::Error;
use tracing::Instrument;

use crate::domain::coaching::{
    compute_flags, CoachRequest, CoachResponse, ExtractionError, NormalizationError,
    PromptCompiler, ResponseNormalizer, StructuredExtractor,
};
use crate::ports::{GenerationError, GenerationRequest, TextGenerator};

/// Command to evaluate one conversation window
#[derive(Debug, Clone)]
pub struct GetAdviceCommand {
    pub request: CoachRequest,
    /// Correlates log lines for this request
    pub trace_id: String,
    /// Reference point for the heuristic recency window
    pub received_at: DateTime<Utc>,
}

impl GetAdviceCommand {
    pub fn new(request: CoachRequest, trace_id: impl Into<String>) -> Self {
        Self {
            request,
            trace_id: trace_id.into(),
            received_at: Utc::now(),
        }
    }

    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = at;
        self
    }
}

/// Why a request took the degraded path
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdviceError {
    #[error("text generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("text generation exceeded {timeout:?} deadline")]
    Deadline { timeout: Duration },

    #[error("model output could not be normalized: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("pipeline panicked: {0}")]
    Panicked(String),
}

impl AdviceError {
    /// Short failure class for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            AdviceError::Generation(err) => err.kind(),
            AdviceError::Deadline { .. } => "timeout",
            AdviceError::Normalization(_) => "coercion",
            AdviceError::Panicked(_) => "internal",
        }
    }
}

/// Terminal state of one advisory request
#[derive(Debug, Clone, PartialEq)]
pub enum AdviceOutcome {
    /// Every stage succeeded
    Nominal(CoachResponse),
    /// Some stage failed; the response is the safe default
    Degraded(AdviceError),
}

impl AdviceOutcome {
    /// The response to return to the caller
    pub fn into_response(self) -> CoachResponse {
        match self {
            AdviceOutcome::Nominal(response) => response,
            AdviceOutcome::Degraded(_) => CoachResponse::safe_default(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AdviceOutcome::Degraded(_))
    }
}

/// Handler for advisory requests
pub struct GetAdviceHandler<G: ?Sized + TextGenerator> {
    generator: Arc<G>,
    timeout: Duration,
    compiler: PromptCompiler,
    extractor: StructuredExtractor,
    normalizer: ResponseNormalizer,
}

impl<G: ?Sized + TextGenerator> GetAdviceHandler<G> {
    pub fn new(generator: Arc<G>, timeout: Duration) -> Self {
        Self {
            generator,
            timeout,
            compiler: PromptCompiler::new(),
            extractor: StructuredExtractor::new(),
            normalizer: ResponseNormalizer::new(),
        }
    }

    /// Returns the response for the command. Never fails.
    pub async fn handle(&self, cmd: GetAdviceCommand) -> CoachResponse {
        self.evaluate(cmd).await.into_response()
    }

    /// Runs the pipeline and reports which terminal state it reached.
    pub async fn evaluate(&self, cmd: GetAdviceCommand) -> AdviceOutcome {
        let span = tracing::info_span!("coach_advice", trace_id = %cmd.trace_id);

        let result = AssertUnwindSafe(self.run_pipeline(&cmd))
            .catch_unwind()
            .instrument(span.clone())
            .await
            .unwrap_or_else(|payload| Err(AdviceError::Panicked(panic_message(payload))));

        span.in_scope(|| match result {
            Ok(response) => {
                tracing::info!(
                    should_intervene = response.should_intervene,
                    kind = %response.kind,
                    confidence = response.confidence,
                    "Advice produced"
                );
                AdviceOutcome::Nominal(response)
            }
            Err(err) => {
                tracing::warn!(failure = err.kind(), "Falling back to safe default: {}", err);
                AdviceOutcome::Degraded(err)
            }
        })
    }

    async fn run_pipeline(&self, cmd: &GetAdviceCommand) -> Result<CoachResponse, AdviceError> {
        let request = &cmd.request;
        let flags = match &request.flags {
            Some(flags) => flags.clone(),
            None => {
                let now = cmd.received_at.timestamp_millis() as f64 / 1000.0;
                let computed = compute_flags(&request.turns, now);
                tracing::debug!(?computed, "Computed heuristic flags");
                computed
            }
        };

        let prompt = self
            .compiler
            .compile(&request.turns, &request.speaker_labels, &flags);
        tracing::debug!(
            turns = request.window().len(),
            prompt_chars = prompt.as_str().len(),
            "Compiled coaching prompt"
        );

        let generation_request =
            GenerationRequest::new(prompt.into_inner()).with_trace_id(&cmd.trace_id);
        let generation = tokio::time::timeout(
            self.timeout,
            self.generator.generate(generation_request),
        )
        .await
        .map_err(|_| AdviceError::Deadline {
            timeout: self.timeout,
        })??;

        let extracted = match self.extractor.try_extract(&generation.text) {
            Ok(object) => Some(object),
            Err(err) => {
                log_extraction_miss(&err, generation.text.len());
                None
            }
        };

        Ok(self.normalizer.normalize(extracted.as_ref())?)
    }
}

fn log_extraction_miss(err: &ExtractionError, output_chars: usize) {
    tracing::debug!(output_chars, "No structured advice in model output: {}", err);
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockError, MockTextGenerator};
    use crate::domain::coaching::{InterventionType, Speaker, Turn, NO_FLAGS};

    fn handler(generator: MockTextGenerator) -> GetAdviceHandler<MockTextGenerator> {
        GetAdviceHandler::new(Arc::new(generator), Duration::from_secs(60))
    }

    fn request() -> CoachRequest {
        CoachRequest::new(
            vec![
                Turn::new(Speaker::First, "You never listen to me.", 100.0),
                Turn::new(Speaker::Second, "That's not fair.", 105.0),
            ],
            vec!["negativity".to_string()],
        )
    }

    fn command(request: CoachRequest) -> GetAdviceCommand {
        GetAdviceCommand::new(request, "trace-1")
    }

    #[tokio::test]
    async fn embedded_object_becomes_the_response() {
        let generator = MockTextGenerator::new().with_response(
            r#"blah blah {"should_intervene": true, "type": "reframe", "confidence": 0.8} trailing notes"#,
        );

        let response = handler(generator).handle(command(request())).await;

        assert_eq!(
            response,
            CoachResponse {
                should_intervene: true,
                kind: InterventionType::Reframe,
                message: None,
                confidence: 0.8,
            }
        );
    }

    #[tokio::test]
    async fn empty_generation_is_the_safe_default() {
        let generator = MockTextGenerator::new().with_response("");
        let outcome = handler(generator).evaluate(command(request())).await;

        // An empty generation is "no data", which is still the nominal path.
        assert_eq!(outcome, AdviceOutcome::Nominal(CoachResponse::safe_default()));
    }

    #[tokio::test]
    async fn malformed_json_is_the_safe_default() {
        let generator = MockTextGenerator::new().with_response("{not valid json");
        let response = handler(generator).handle(command(request())).await;
        assert!(response.is_safe_default());
    }

    #[tokio::test]
    async fn coercion_failure_collapses_the_whole_response() {
        let generator = MockTextGenerator::new().with_response(
            r#"{"should_intervene": true, "type": "timeout", "confidence": "very sure"}"#,
        );
        let outcome = handler(generator).evaluate(command(request())).await;

        assert!(matches!(
            outcome,
            AdviceOutcome::Degraded(AdviceError::Normalization(
                NormalizationError::InvalidConfidence(_)
            ))
        ));
        assert!(outcome.into_response().is_safe_default());
    }

    #[tokio::test]
    async fn unknown_type_collapses_to_safe_default() {
        let generator = MockTextGenerator::new()
            .with_response(r#"{"should_intervene": true, "type": "lecture", "message": "Calm down."}"#);
        let response = handler(generator).handle(command(request())).await;
        assert!(response.is_safe_default());
    }

    #[tokio::test]
    async fn generation_errors_are_degraded() {
        let errors = [
            MockError::Network {
                message: "connection refused".to_string(),
            },
            MockError::Status {
                status: 500,
                body: "boom".to_string(),
            },
            MockError::Timeout {
                timeout: Duration::from_secs(60),
            },
        ];
        for error in errors {
            let generator = MockTextGenerator::new().with_error(error);
            let outcome = handler(generator).evaluate(command(request())).await;
            assert!(matches!(
                outcome,
                AdviceOutcome::Degraded(AdviceError::Generation(_))
            ));
            assert!(outcome.into_response().is_safe_default());
        }
    }

    #[tokio::test]
    async fn slow_model_hits_the_deadline() {
        let generator = MockTextGenerator::new()
            .with_response(r#"{"should_intervene": true}"#)
            .with_delay(Duration::from_secs(5));
        let handler = GetAdviceHandler::new(Arc::new(generator), Duration::from_millis(50));

        let start = std::time::Instant::now();
        let outcome = handler.evaluate(command(request())).await;

        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(
            outcome,
            AdviceOutcome::Degraded(AdviceError::Deadline {
                timeout: Duration::from_millis(50)
            })
        );
        assert!(outcome.into_response().is_safe_default());
    }

    #[tokio::test]
    async fn panicking_generator_is_contained() {
        let generator = MockTextGenerator::new().with_panic("model adapter bug");
        let outcome = handler(generator).evaluate(command(request())).await;

        assert_eq!(
            outcome,
            AdviceOutcome::Degraded(AdviceError::Panicked("model adapter bug".to_string()))
        );
    }

    #[tokio::test]
    async fn sends_one_prompt_with_transcript_and_flags() {
        let generator = MockTextGenerator::new();
        let handler = handler(generator.clone());

        handler.handle(command(request())).await;

        let calls = generator.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].trace_id, "trace-1");
        assert!(calls[0].prompt.contains("Speaker 1: You never listen to me."));
        assert!(calls[0].prompt.contains("Heuristic flags: negativity"));
    }

    #[tokio::test]
    async fn empty_flags_are_rendered_as_none() {
        let generator = MockTextGenerator::new();
        let mut req = request();
        req.flags = Some(vec![]);

        handler(generator.clone()).handle(command(req)).await;

        let prompt = &generator.get_calls()[0].prompt;
        assert!(prompt.contains(&format!("Heuristic flags: {}", NO_FLAGS)));
    }

    #[tokio::test]
    async fn absent_flags_are_computed_from_recent_turns() {
        let generator = MockTextGenerator::new();
        let mut req = request();
        req.flags = None;
        let received_at = DateTime::from_timestamp(110, 0).unwrap();

        handler(generator.clone())
            .handle(command(req).received_at(received_at))
            .await;

        let prompt = &generator.get_calls()[0].prompt;
        assert!(prompt.contains("Heuristic flags: you_statements"));
    }
}
