//! Prompt compilation for the coaching model.
//!
//! The compiled document embeds the output contract and the closed set of
//! intervention types so the model has every chance to answer with a single
//! parseable object. Nothing downstream relies on it doing so.

use std::fmt::Write as _;

use super::response::InterventionType;
use super::turn::{window, Speaker, SpeakerLabels, Turn};

/// Rendered when the flag set is empty.
pub const NO_FLAGS: &str = "none";

/// Heading that precedes the transcript lines.
pub const TRANSCRIPT_HEADING: &str = "Conversation (oldest first):";

/// Heading that precedes the flag list.
pub const FLAGS_HEADING: &str = "Heuristic flags:";

/// Prompt text produced once per request and handed straight to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt(String);

impl CompiledPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The `"<name>: <text>"` lines of the embedded transcript.
    pub fn transcript_lines(&self) -> Vec<&str> {
        self.0
            .lines()
            .skip_while(|line| *line != TRANSCRIPT_HEADING)
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect()
    }
}

/// Renders the instruction document for the coaching model.
#[derive(Debug, Clone, Default)]
pub struct PromptCompiler;

impl PromptCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compiles the prompt from the most recent turns, labels and flags.
    ///
    /// Only the last [`super::TURN_WINDOW`] turns are rendered. Never fails.
    pub fn compile(
        &self,
        turns: &[Turn],
        labels: &SpeakerLabels,
        flags: &[String],
    ) -> CompiledPrompt {
        let first = single_line(labels.resolve(Speaker::First));
        let second = single_line(labels.resolve(Speaker::Second));

        let mut out = String::with_capacity(2048);

        let _ = writeln!(
            out,
            "You are a warm, neutral relationship communication coach quietly listening \
             to a live conversation between {first} and {second}."
        );
        out.push_str(
            "Decide whether a brief intervention right now would help them hear each other. \
             Most of the time the right answer is to stay silent.\n\n",
        );

        out.push_str("Rules:\n");
        out.push_str("- Keep any message to one or two short sentences, spoken directly to both people.\n");
        out.push_str("- Use neutral, non-judgmental phrasing and never take sides.\n");
        out.push_str("- Do not diagnose or give medical, legal, or therapeutic advice.\n");
        out.push_str(
            "- If anything suggests abuse or danger, do not coach; set should_intervene to false.\n",
        );
        out.push_str("- Only intervene when it is clearly useful.\n\n");

        out.push_str("Intervention types:\n");
        for kind in InterventionType::ALL {
            let _ = writeln!(out, "- {}: {}", kind.as_str(), kind.description());
        }
        out.push('\n');

        out.push_str(TRANSCRIPT_HEADING);
        out.push('\n');
        for turn in window(turns) {
            let label = match turn.speaker {
                Speaker::First => &first,
                Speaker::Second => &second,
            };
            let _ = writeln!(out, "{}: {}", label, single_line(&turn.text));
        }
        out.push('\n');

        let _ = writeln!(out, "{} {}", FLAGS_HEADING, render_flags(flags));
        out.push('\n');

        out.push_str(
            "Respond with a single JSON object and nothing else. It must have exactly these fields:\n",
        );
        let kinds = InterventionType::ALL
            .iter()
            .map(|kind| format!("\"{}\"", kind.as_str()))
            .collect::<Vec<_>>()
            .join(" | ");
        let _ = writeln!(
            out,
            "{{\"should_intervene\": true | false, \"type\": {kinds}, \
             \"message\": \"<short text, or null when not intervening>\", \
             \"confidence\": <number between 0 and 1>}}"
        );

        CompiledPrompt(out)
    }
}

/// Comma-joined flags with blanks dropped and duplicates collapsed, or
/// [`NO_FLAGS`] when nothing remains.
pub fn render_flags(flags: &[String]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for flag in flags.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
        if !seen.contains(&flag) {
            seen.push(flag);
        }
    }
    if seen.is_empty() {
        NO_FLAGS.to_string()
    } else {
        seen.join(", ")
    }
}

/// Trims the text and joins its lines with single spaces so a turn always
/// occupies one transcript line.
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
