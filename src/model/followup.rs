//! Follow-up types: actionable records and their lifecycle.
//!
//! A follow-up moves through a small state machine:
//!
//! ```text
//! pending ──AssistantContact──▶ ai-contacted ──Resolve──▶ completed
//!    │                            ▲      │
//!    │                            └──────┘ AssistantContact
//!    └───────────────Resolve──────────────────────────────▶ completed
//! ```
//!
//! `completed` is terminal. [`FollowUpStatus::apply`] is the only place
//! transitions are decided.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::wellbeing::{Concern, Mood, Rating};

/// A unit of required outreach derived from an observation or a check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: Uuid,
    pub volunteer_id: String,

    /// The observation that triggered it. `None` for check-in follow-ups.
    pub observation_id: Option<Uuid>,

    pub participant: String,
    pub event: String,
    pub signal: Signal,
    pub rating: Rating,
    pub notes: String,

    /// Fixed at creation.
    pub assignee: Assignee,

    pub status: FollowUpStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,

    #[serde(default)]
    pub messages: Vec<Message>,
}

impl FollowUp {
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// The wellbeing signal captured when the follow-up was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Signal {
    /// Mood from an observation.
    Mood(Mood),

    /// Concern from a wellbeing check-in.
    Concern(Concern),
}

impl Signal {
    /// What the snapshot measures: `Mood` or `Concern`.
    pub fn kind_label(self) -> &'static str {
        match self {
            Self::Mood(_) => "Mood",
            Self::Concern(_) => "Concern",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mood(m) => write!(f, "{m}"),
            Self::Concern(c) => write!(f, "{c}"),
        }
    }
}

/// Who is responsible for the outreach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Assignee {
    AutomatedAssistant,
    HumanVolunteer,
}

impl Assignee {
    pub fn label(self) -> &'static str {
        match self {
            Self::AutomatedAssistant => "automated-assistant",
            Self::HumanVolunteer => "human-volunteer",
        }
    }
}

/// Where a follow-up stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FollowUpStatus {
    Pending,
    AiContacted,
    Completed,
}

/// A requested move through the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The automated assistant sent a message.
    AssistantContact,

    /// The follow-up was marked resolved.
    Resolve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot apply {transition:?}: follow-up is already completed")]
    Terminal { transition: Transition },
}

impl FollowUpStatus {
    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    /// Returns the status reached by applying `transition`, or an error if
    /// the move is illegal from the current status.
    pub fn apply(self, transition: Transition) -> Result<Self, TransitionError> {
        match (self, transition) {
            (Self::Completed, transition) => Err(TransitionError::Terminal { transition }),
            (Self::Pending | Self::AiContacted, Transition::AssistantContact) => {
                Ok(Self::AiContacted)
            }
            (Self::Pending | Self::AiContacted, Transition::Resolve) => Ok(Self::Completed),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AiContacted => "ai-contacted",
            Self::Completed => "completed",
        }
    }
}

/// One message exchanged on a follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub sent_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sender {
    /// The automated assistant.
    Assistant,

    /// Lifecycle notices, e.g. resolution.
    System,
}
