//! Observation: a wellbeing report about one participant at one event.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::wellbeing::{Mood, Rating};

/// An immutable wellbeing report. Append-only; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: Uuid,

    /// The volunteer who recorded it.
    pub volunteer_id: String,

    pub participant: String,
    pub event: String,
    pub mood: Mood,
    pub rating: Rating,

    /// Free text; may be empty.
    pub notes: String,

    pub created_at: Timestamp,
}
