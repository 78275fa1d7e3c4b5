//! Lightweight conversation heuristics.
//!
//! Used to derive the flag set when a caller does not supply one. The scores
//! are deliberately crude keyword counts; the language model makes the actual
//! judgement.

use super::turn::{Speaker, Turn};

/// Only turns this recent (relative to "now") are scored.
pub const RECENT_WINDOW_SECS: f64 = 120.0;

/// Number of recent turns whose text is scored for tone.
const SCORED_TURNS: usize = 10;

const DOMINANCE_RATIO: f64 = 0.75;
const NEGATIVITY_THRESHOLD: u32 = 2;
const YOU_STATEMENT_THRESHOLD: u32 = 2;

const NEGATIVE_WORDS: &[&str] = &[
    "always",
    "never",
    "stupid",
    "hate",
    "annoying",
    "lazy",
    "useless",
    "ridiculous",
    "whatever",
    "shut up",
];

const ABSOLUTES: &[&str] = &["always", "never", "every time", "again"];

pub const FLAG_DOMINANCE: &str = "dominance";
pub const FLAG_NEGATIVITY: &str = "negativity";
pub const FLAG_YOU_STATEMENTS: &str = "you_statements";

/// Counts how many distinct negative markers appear in the text.
pub fn negativity_score(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    NEGATIVE_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count() as u32
}

/// Counts standalone "you" occurrences plus any absolute phrasing.
pub fn you_statement_score(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    let you_count = lowered
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| *token == "you")
        .count() as u32;
    let absolutes = ABSOLUTES
        .iter()
        .filter(|phrase| lowered.contains(*phrase))
        .count() as u32;
    you_count + absolutes
}

/// Derives heuristic flags from the turns spoken within the last
/// [`RECENT_WINDOW_SECS`] before `now` (seconds since the epoch).
pub fn compute_flags(turns: &[Turn], now: f64) -> Vec<String> {
    let recent: Vec<&Turn> = turns
        .iter()
        .filter(|turn| now - turn.timestamp <= RECENT_WINDOW_SECS)
        .collect();
    if recent.is_empty() {
        return Vec::new();
    }

    let first = recent
        .iter()
        .filter(|turn| turn.speaker == Speaker::First)
        .count();
    let second = recent.len() - first;
    let dominance = first.max(second) as f64 / recent.len().max(1) as f64;

    let scored = &recent[recent.len().saturating_sub(SCORED_TURNS)..];
    let negativity: u32 = scored.iter().map(|turn| negativity_score(&turn.text)).sum();
    let you_statements: u32 = scored
        .iter()
        .map(|turn| you_statement_score(&turn.text))
        .sum();

    let mut flags = Vec::new();
    if dominance >= DOMINANCE_RATIO {
        flags.push(FLAG_DOMINANCE.to_string());
    }
    if negativity >= NEGATIVITY_THRESHOLD {
        flags.push(FLAG_NEGATIVITY.to_string());
    }
    if you_statements >= YOU_STATEMENT_THRESHOLD {
        flags.push(FLAG_YOU_STATEMENTS.to_string());
    }
    flags
}
