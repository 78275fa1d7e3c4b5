//! The advisory response contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of coaching actions the service may recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterventionType {
    MicroCoach,
    Reframe,
    Timeout,
    SkillPractice,
    Encouragement,
}

impl InterventionType {
    /// All variants, in the order they are presented to the model.
    pub const ALL: [InterventionType; 5] = [
        InterventionType::MicroCoach,
        InterventionType::Reframe,
        InterventionType::Timeout,
        InterventionType::SkillPractice,
        InterventionType::Encouragement,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionType::MicroCoach => "micro-coach",
            InterventionType::Reframe => "reframe",
            InterventionType::Timeout => "timeout",
            InterventionType::SkillPractice => "skill-practice",
            InterventionType::Encouragement => "encouragement",
        }
    }

    /// One-line description used in the model instructions.
    pub fn description(&self) -> &'static str {
        match self {
            InterventionType::MicroCoach => {
                "a short, concrete nudge about how to say the next thing"
            }
            InterventionType::Reframe => {
                "restate a charged remark as an underlying need or feeling"
            }
            InterventionType::Timeout => {
                "suggest a brief pause when the exchange is escalating"
            }
            InterventionType::SkillPractice => {
                "invite both people to try a listening skill such as reflecting back"
            }
            InterventionType::Encouragement => {
                "acknowledge something the pair is doing well"
            }
        }
    }
}

impl fmt::Display for InterventionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no intervention type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intervention type: {0}")]
pub struct UnknownInterventionType(pub String);

impl FromStr for InterventionType {
    type Err = UnknownInterventionType;

    /// Case-insensitive; `_` is accepted in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        InterventionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownInterventionType(s.to_string()))
    }
}

/// Strict output of the advisory pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachResponse {
    pub should_intervene: bool,
    #[serde(rename = "type")]
    pub kind: InterventionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Always within `[0, 1]`.
    pub confidence: f64,
}

impl CoachResponse {
    /// The conservative "do nothing" answer returned whenever any stage fails.
    pub fn safe_default() -> Self {
        Self {
            should_intervene: false,
            kind: InterventionType::Encouragement,
            message: None,
            confidence: 0.0,
        }
    }

    /// Returns true if this is exactly the fallback response.
    pub fn is_safe_default(&self) -> bool {
        *self == Self::safe_default()
    }
}
