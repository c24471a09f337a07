//! Core data model for `ElderConnect`.
//!
//! These types represent what a volunteer records about participants:
//! observations, follow-ups, and history log entries. Every record is
//! scoped to exactly one owning volunteer.

mod followup;
mod form;
mod history;
mod observation;
mod wellbeing;

use uuid::Uuid;

pub use followup::{
    Assignee, FollowUp, FollowUpStatus, Message, Sender, Signal, Transition, TransitionError,
};
pub use form::{CheckinForm, ObservationForm};
pub use history::HistoryEntry;
pub use observation::Observation;
pub use wellbeing::{Concern, EnergyLevel, Mood, Rating};

/// A record persisted under one fixed storage key, owned by one volunteer.
pub trait Record: Clone + serde::Serialize + serde::de::DeserializeOwned {
    /// The storage key holding every record of this kind.
    const KEY: &'static str;

    /// The serialized field naming the owning volunteer.
    const OWNER_FIELD: &'static str = "volunteerId";

    fn id(&self) -> Uuid;

    fn owner(&self) -> &str;
}

impl Record for Observation {
    const KEY: &'static str = "volunteerObservations";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &str {
        &self.volunteer_id
    }
}

impl Record for FollowUp {
    const KEY: &'static str = "volunteerFollowUps";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &str {
        &self.volunteer_id
    }
}

impl Record for HistoryEntry {
    const KEY: &'static str = "volunteerHistoryLogs";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &str {
        &self.volunteer_id
    }
}
