//! Conversation turns and the advisory request that carries them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of turns considered for a single advisory decision.
pub const TURN_WINDOW: usize = 16;

/// One of the two fixed conversation participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "s1")]
    First,
    #[serde(rename = "s2")]
    Second,
}

impl Speaker {
    /// Wire identifier (`"s1"` / `"s2"`).
    pub fn id(&self) -> &'static str {
        match self {
            Speaker::First => "s1",
            Speaker::Second => "s2",
        }
    }

    /// Label used when the caller supplies no display name.
    pub fn default_label(&self) -> &'static str {
        match self {
            Speaker::First => "Speaker 1",
            Speaker::Second => "Speaker 2",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    /// Seconds since the Unix epoch.
    #[serde(default, alias = "ts")]
    pub timestamp: f64,
}

impl Turn {
    /// Creates a new turn.
    pub fn new(speaker: Speaker, text: impl Into<String>, timestamp: f64) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp,
        }
    }
}

/// Display names keyed by speaker identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerLabels(HashMap<String, String>);

impl SpeakerLabels {
    /// Creates an empty label set (every speaker resolves to its default label).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name for a speaker.
    pub fn with_label(mut self, speaker: Speaker, label: impl Into<String>) -> Self {
        self.0.insert(speaker.id().to_string(), label.into());
        self
    }

    /// Resolves the display name, falling back to the generic label when
    /// the entry is missing or blank.
    pub fn resolve(&self, speaker: Speaker) -> &str {
        self.0
            .get(speaker.id())
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| speaker.default_label())
    }
}

/// Input to the advisory pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachRequest {
    /// Oldest first.
    #[serde(default)]
    pub turns: Vec<Turn>,
    /// `None` when the caller did not send the field at all.
    #[serde(default)]
    pub flags: Option<Vec<String>>,
    #[serde(default)]
    pub speaker_labels: SpeakerLabels,
}

impl CoachRequest {
    /// Creates a request with an explicit (possibly empty) flag set.
    pub fn new(turns: Vec<Turn>, flags: Vec<String>) -> Self {
        Self {
            turns,
            flags: Some(flags),
            speaker_labels: SpeakerLabels::new(),
        }
    }

    /// Sets the speaker display names.
    pub fn with_speaker_labels(mut self, labels: SpeakerLabels) -> Self {
        self.speaker_labels = labels;
        self
    }

    /// The most recent turns this request will be judged on.
    pub fn window(&self) -> &[Turn] {
        window(&self.turns)
    }
}

/// Selects at most the last [`TURN_WINDOW`] turns, preserving order.
pub fn window(turns: &[Turn]) -> &[Turn] {
    let start = turns.len().saturating_sub(TURN_WINDOW);
    &turns[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| {
                let speaker = if i % 2 == 0 { Speaker::First } else { Speaker::Second };
                Turn::new(speaker, format!("line {}", i), i as f64)
            })
            .collect()
    }

    #[test]
    fn window_keeps_short_conversations_whole() {
        let all = turns(5);
        assert_eq!(window(&all), &all[..]);
    }

    #[test]
    fn window_keeps_the_last_sixteen_in_order() {
        let all = turns(40);
        let kept = window(&all);
        assert_eq!(kept.len(), TURN_WINDOW);
        assert_eq!(kept[0].text, "line 24");
        assert_eq!(kept[15].text, "line 39");
    }

    #[test]
    fn window_of_nothing_is_empty() {
        assert!(window(&[]).is_empty());
    }

    #[test]
    fn labels_fall_back_to_generic_names() {
        let labels = SpeakerLabels::new()
            .with_label(Speaker::First, "Alex")
            .with_label(Speaker::Second, "   ");

        assert_eq!(labels.resolve(Speaker::First), "Alex");
        assert_eq!(labels.resolve(Speaker::Second), "Speaker 2");
        assert_eq!(SpeakerLabels::new().resolve(Speaker::First), "Speaker 1");
    }

    #[test]
    fn turn_accepts_short_timestamp_field() {
        let turn: Turn =
            serde_json::from_str(r#"{"speaker": "s2", "text": "hi", "ts": 12.5}"#).unwrap();
        assert_eq!(turn.speaker, Speaker::Second);
        assert_eq!(turn.timestamp, 12.5);
    }

    #[test]
    fn turn_rejects_unknown_speaker() {
        let result = serde_json::from_str::<Turn>(r#"{"speaker": "s3", "text": "hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn request_distinguishes_absent_and_empty_flags() {
        let absent: CoachRequest = serde_json::from_str(r#"{"turns": []}"#).unwrap();
        assert_eq!(absent.flags, None);

        let empty: CoachRequest = serde_json::from_str(r#"{"turns": [], "flags": []}"#).unwrap();
        assert_eq!(empty.flags, Some(vec![]));
    }

    #[test]
    fn request_parses_labels() {
        let request: CoachRequest = serde_json::from_str(
            r#"{"turns": [], "flags": [], "speaker_labels": {"s1": "Sam", "s2": "Jo"}}"#,
        )
        .unwrap();
        assert_eq!(request.speaker_labels.resolve(Speaker::First), "Sam");
        assert_eq!(request.speaker_labels.resolve(Speaker::Second), "Jo");
    }
}
