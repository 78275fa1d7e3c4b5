//! Conversational coaching domain.
//!
//! Pure building blocks of the advisory pipeline:
//!
//! - `turn` - turns, speaker labels, the request, and the turn window
//! - `heuristics` - keyword/ratio flags derived from recent turns
//! - `prompt` - deterministic instruction document for the model
//! - `extractor` - first-`{` to last-`}` object recovery from model text
//! - `normalizer` - total coercion onto the response contract
//! - `response` - the response contract and intervention types

mod extractor;
mod heuristics;
mod normalizer;
mod prompt;
mod response;
mod turn;

pub use extractor::{ExtractedObject, ExtractionError, StructuredExtractor};
pub use heuristics::{
    compute_flags, negativity_score, you_statement_score, FLAG_DOMINANCE, FLAG_NEGATIVITY,
    FLAG_YOU_STATEMENTS, RECENT_WINDOW_SECS,
};
pub use normalizer::{
    NormalizationError, ResponseNormalizer, DEFAULT_CONFIDENCE, DEFAULT_INTERVENTION,
};
pub use prompt::{
    render_flags, CompiledPrompt, PromptCompiler, FLAGS_HEADING, NO_FLAGS, TRANSCRIPT_HEADING,
};
pub use response::{CoachResponse, InterventionType, UnknownInterventionType};
pub use turn::{window, CoachRequest, Speaker, SpeakerLabels, Turn, TURN_WINDOW};
