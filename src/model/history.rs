//! History log: freeform audit records of actions a volunteer took.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single audit record, e.g. an encouragement sent or a wellbeing check completed.
///
/// Not tied to the follow-up lifecycle. Immutable and append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub volunteer_id: String,
    pub title: String,
    pub summary: String,
    pub details: String,
    pub created_at: Timestamp,
}
