//! Wellbeing vocabulary: moods, ratings, energy levels, and concerns.
//!
//! Each type parses from the label a volunteer types (case-insensitive)
//! and displays as that same label.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A label that didn't match any known value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl ParseValueError {
    fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

/// How a participant seemed during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Joyful,
    Engaged,
    Calm,
    Quiet,
    Tired,
    Anxious,
    Distressed,
}

impl Mood {
    pub const ALL: [Self; 7] = [
        Self::Joyful,
        Self::Engaged,
        Self::Calm,
        Self::Quiet,
        Self::Tired,
        Self::Anxious,
        Self::Distressed,
    ];

    /// Moods that escalate to automated outreach regardless of rating.
    pub fn is_alert(self) -> bool {
        matches!(self, Self::Anxious | Self::Distressed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Joyful => "Joyful",
            Self::Engaged => "Engaged",
            Self::Calm => "Calm",
            Self::Quiet => "Quiet",
            Self::Tired => "Tired",
            Self::Anxious => "Anxious",
            Self::Distressed => "Distressed",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ParseValueError::new("mood", s, &Self::ALL.map(Self::label))
            })
    }
}

/// An engagement rating from 1 (critical) to 5 (thriving).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// The rating recorded when none was collected.
    pub const NEUTRAL: Self = Self(3);

    pub fn value(self) -> u8 {
        self.0
    }

    /// Ratings at or below this escalate to automated outreach.
    pub fn is_low(self) -> bool {
        self.0 <= 2
    }

    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "Critical support needed",
            2 => "Struggling, please intervene",
            3 => "Balanced",
            4 => "Positive and connected",
            _ => "Thriving and energised",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("rating must be a whole number, got '{}'", s.trim()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// A participant's energy during a wellbeing check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnergyLevel {
    High,
    Steady,
    Low,
    Exhausted,
}

impl EnergyLevel {
    pub const ALL: [Self; 4] = [Self::High, Self::Steady, Self::Low, Self::Exhausted];

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Steady => "steady",
            Self::Low => "low",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EnergyLevel {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseValueError::new("energy level", s, &Self::ALL.map(Self::label)))
    }
}

/// What a volunteer flagged during a wellbeing check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Concern {
    NoConcerns,
    MonitorNextSession,
    NeedsImmediateFollowup,
    RequestsWellnessResources,
}

impl Concern {
    pub const ALL: [Self; 4] = [
        Self::NoConcerns,
        Self::MonitorNextSession,
        Self::NeedsImmediateFollowup,
        Self::RequestsWellnessResources,
    ];

    /// Concerns that put the participant in the volunteer follow-up queue.
    pub fn needs_followup(self) -> bool {
        matches!(
            self,
            Self::NeedsImmediateFollowup | Self::RequestsWellnessResources
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoConcerns => "no-concerns",
            Self::MonitorNextSession => "monitor-next-session",
            Self::NeedsImmediateFollowup => "needs-immediate-followup",
            Self::RequestsWellnessResources => "requests-wellness-resources",
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Concern {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseValueError::new("concern", s, &Self::ALL.map(Self::label)))
    }
}
