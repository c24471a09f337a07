//! Raw submission fields, as entered by a volunteer.
//!
//! Values stay as text until the triage engine validates them.

/// An engagement rating submission.
#[derive(Debug, Clone, Default)]
pub struct ObservationForm {
    pub participant: String,
    pub event: String,
    pub mood: String,
    pub rating: String,
    pub notes: String,

    /// The volunteer asked to follow up in person.
    pub request_followup: bool,
}

/// A wellbeing check-in submission.
#[derive(Debug, Clone, Default)]
pub struct CheckinForm {
    pub participant: String,
    pub event: String,
    pub energy: String,
    pub concern: String,
    pub notes: String,
}
