//! Follow-up triage: the volunteer's record-keeping workflow.
//!
//! An observation or a wellbeing check-in goes in; the triage rules decide
//! whether it escalates to a follow-up and who owns the outreach. Follow-ups
//! then move through their lifecycle until resolved.
//!
//! Every operation is scoped to the owning volunteer the engine was built for.
//! Reads re-derive from the stored collections on every call.

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{
    Assignee, CheckinForm, Concern, EnergyLevel, FollowUp, FollowUpStatus, HistoryEntry, Message,
    Mood, Observation, ObservationForm, Rating, Sender, Signal, Transition, TransitionError,
};
use crate::storage::{Repository, StorageError};

/// The note appended when a follow-up is resolved.
pub const RESOLVED_MESSAGE: &str = "Follow-up marked as resolved.";

/// Errors reported by triage operations. None of them change stored state.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("follow-up not found: {0}")]
    NotFound(Uuid),

    #[error("message is empty")]
    EmptyMessage,

    #[error("follow-up {0} is already completed")]
    TerminalState(Uuid),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = core::result::Result<T, TriageError>;

/// What an observation submission produced.
#[derive(Debug, Clone)]
pub struct Submission {
    pub observation: Observation,

    /// At most one follow-up per observation.
    pub follow_up: Option<FollowUp>,
}

/// What a wellbeing check-in produced.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub entry: HistoryEntry,
    pub follow_up: Option<FollowUp>,
}

/// Aggregates over the owner's current records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub observations: usize,
    pub open_follow_ups: usize,
    pub completed_follow_ups: usize,
    pub assistant_follow_ups: usize,
}

/// Decides who, if anyone, follows up on an observation.
///
/// Risk signals (low rating or alert mood) go to the automated assistant.
/// Otherwise an explicit request goes straight to a human volunteer.
pub fn escalate(mood: Mood, rating: Rating, requested: bool) -> Option<Assignee> {
    if rating.is_low() || mood.is_alert() {
        Some(Assignee::AutomatedAssistant)
    } else if requested {
        Some(Assignee::HumanVolunteer)
    } else {
        None
    }
}

/// The triage engine for one volunteer.
pub struct Triage<'a, R> {
    repo: &'a R,
    owner: String,
}

impl<'a, R: Repository> Triage<'a, R> {
    pub fn new(repo: &'a R, owner: impl Into<String>) -> Self {
        Self {
            repo,
            owner: owner.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    // ── Entry points ──

    /// Validates and records an observation, creating a follow-up if it escalates.
    ///
    /// If the follow-up can't be written the observation is rolled back.
    pub fn submit_observation(&self, form: &ObservationForm) -> Result<Submission> {
        let participant = required("participant name", &form.participant)?;
        let event = required("event name", &form.event)?;
        let mood: Mood = required("mood", &form.mood)?
            .parse()
            .map_err(invalid)?;
        let rating: Rating = required("rating", &form.rating)?
            .parse()
            .map_err(invalid)?;

        let now = Timestamp::now();
        let observation = Observation {
            id: Uuid::new_v4(),
            volunteer_id: self.owner.clone(),
            participant,
            event,
            mood,
            rating,
            notes: form.notes.trim().to_string(),
            created_at: now,
        };
        let follow_up = escalate(mood, rating, form.request_followup).map(|assignee| {
            self.new_follow_up(
                Some(observation.id),
                &observation.participant,
                &observation.event,
                Signal::Mood(mood),
                rating,
                &observation.notes,
                assignee,
                now,
            )
        });

        self.repo.upsert(&observation)?;
        if let Err(e) = follow_up.as_ref().map_or(Ok(()), |f| self.repo.upsert(f)) {
            // Leave nothing behind so a retry doesn't duplicate the observation.
            if let Err(undo) = self.repo.remove::<Observation>(observation.id) {
                tracing::warn!(
                    observation = %observation.id,
                    error = %undo,
                    "failed to roll back observation"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            owner = %self.owner,
            observation = %observation.id,
            %mood,
            rating = rating.value(),
            "recorded observation"
        );
        if let Some(follow_up) = &follow_up {
            tracing::info!(
                follow_up = %follow_up.id,
                assignee = follow_up.assignee.label(),
                "escalated observation"
            );
        }

        Ok(Submission {
            observation,
            follow_up,
        })
    }

    /// Records a wellbeing check-in in the history log, escalating flagged concerns
    /// to the volunteer queue.
    pub fn submit_checkin(&self, form: &CheckinForm) -> Result<CheckIn> {
        let participant = required("participant name", &form.participant)?;
        let event = required("event name", &form.event)?;
        let energy: EnergyLevel = required("energy level", &form.energy)?
            .parse()
            .map_err(invalid)?;
        let concern: Concern = required("concern", &form.concern)?
            .parse()
            .map_err(invalid)?;
        let notes = form.notes.trim().to_string();

        let now = Timestamp::now();
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            volunteer_id: self.owner.clone(),
            title: format!("{participant} • Wellbeing check"),
            summary: format!("Energy: {energy} · Concern: {concern}"),
            details: notes.clone(),
            created_at: now,
        };
        let follow_up = concern.needs_followup().then(|| {
            self.new_follow_up(
                None,
                &participant,
                &event,
                Signal::Concern(concern),
                Rating::NEUTRAL,
                &notes,
                Assignee::HumanVolunteer,
                now,
            )
        });

        self.repo.upsert(&entry)?;
        if let Err(e) = follow_up.as_ref().map_or(Ok(()), |f| self.repo.upsert(f)) {
            if let Err(undo) = self.repo.remove::<HistoryEntry>(entry.id) {
                tracing::warn!(entry = %entry.id, error = %undo, "failed to roll back check-in");
            }
            return Err(e.into());
        }
        if let Some(follow_up) = &follow_up {
            tracing::info!(follow_up = %follow_up.id, %concern, "escalated check-in");
        }

        Ok(CheckIn { entry, follow_up })
    }

    /// Records an encouragement message sent to a participant.
    pub fn log_encouragement(&self, participant: &str, message: &str) -> Result<HistoryEntry> {
        let participant = required("participant name", participant)?;
        let message = required("message", message)?;

        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            volunteer_id: self.owner.clone(),
            title: format!("{participant} • Encouragement sent"),
            summary: "Encouragement shared".to_string(),
            details: message,
            created_at: Timestamp::now(),
        };
        self.repo.upsert(&entry)?;
        Ok(entry)
    }

    // ── Lifecycle ──

    /// Appends an assistant message, moving a pending follow-up to `ai-contacted`.
    pub fn record_ai_message(&self, id: Uuid, text: &str) -> Result<FollowUp> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TriageError::EmptyMessage);
        }

        let mut follow_up = self.follow_up(id)?;
        follow_up.status = follow_up
            .status
            .apply(Transition::AssistantContact)
            .map_err(|TransitionError::Terminal { .. }| TriageError::TerminalState(id))?;

        let now = Timestamp::now();
        follow_up.messages.push(Message {
            sender: Sender::Assistant,
            text: text.to_string(),
            sent_at: now,
        });
        follow_up.updated_at = now;
        self.repo.upsert(&follow_up)?;
        tracing::info!(follow_up = %id, status = follow_up.status.label(), "assistant message recorded");
        Ok(follow_up)
    }

    /// Marks a follow-up completed.
    ///
    /// Resolving an already-completed follow-up succeeds without changing it.
    pub fn resolve_followup(&self, id: Uuid) -> Result<FollowUp> {
        let mut follow_up = self.follow_up(id)?;
        if follow_up.status.is_terminal() {
            tracing::debug!(follow_up = %id, "already resolved");
            return Ok(follow_up);
        }

        follow_up.status = follow_up
            .status
            .apply(Transition::Resolve)
            .map_err(|TransitionError::Terminal { .. }| TriageError::TerminalState(id))?;

        let now = Timestamp::now();
        follow_up.completed_at = Some(now);
        follow_up.updated_at = now;
        follow_up.messages.push(Message {
            sender: Sender::System,
            text: RESOLVED_MESSAGE.to_string(),
            sent_at: now,
        });
        self.repo.upsert(&follow_up)?;
        tracing::info!(follow_up = %id, "follow-up resolved");
        Ok(follow_up)
    }

    // ── Read models ──

    pub fn observations(&self) -> Result<Vec<Observation>> {
        Ok(self.repo.list_by_owner::<Observation>(&self.owner)?)
    }

    pub fn follow_ups(&self) -> Result<Vec<FollowUp>> {
        Ok(self.repo.list_by_owner::<FollowUp>(&self.owner)?)
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.repo.list_by_owner::<HistoryEntry>(&self.owner)?)
    }

    /// Loads one owned follow-up.
    pub fn follow_up(&self, id: Uuid) -> Result<FollowUp> {
        self.follow_ups()?
            .into_iter()
            .find(|f| f.id == id)
            .ok_or(TriageError::NotFound(id))
    }

    /// Open follow-ups, `pending` first, otherwise in creation order.
    pub fn active_queue(&self) -> Result<Vec<FollowUp>> {
        let mut queue: Vec<FollowUp> = self
            .follow_ups()?
            .into_iter()
            .filter(FollowUp::is_open)
            .collect();
        queue.sort_by_key(|f| f.status != FollowUpStatus::Pending);
        Ok(queue)
    }

    /// Open follow-ups assigned to the automated assistant.
    pub fn pending_assistant_followups(&self) -> Result<Vec<FollowUp>> {
        Ok(self
            .active_queue()?
            .into_iter()
            .filter(|f| f.assignee == Assignee::AutomatedAssistant)
            .collect())
    }

    pub fn counts(&self) -> Result<Counts> {
        let observations = self.observations()?.len();
        let follow_ups = self.follow_ups()?;
        let completed = follow_ups.iter().filter(|f| !f.is_open()).count();
        Ok(Counts {
            observations,
            open_follow_ups: follow_ups.len() - completed,
            completed_follow_ups: completed,
            assistant_follow_ups: follow_ups
                .iter()
                .filter(|f| f.assignee == Assignee::AutomatedAssistant)
                .count(),
        })
    }

    // ── Purge ──

    /// Deletes every observation, follow-up, and history entry owned by this volunteer.
    ///
    /// Other volunteers' records are untouched. Irreversible.
    pub fn purge_owner_data(&self) -> Result<()> {
        self.repo.replace_all::<Observation>(&self.owner, Vec::new())?;
        self.repo.replace_all::<FollowUp>(&self.owner, Vec::new())?;
        self.repo.replace_all::<HistoryEntry>(&self.owner, Vec::new())?;
        tracing::info!(owner = %self.owner, "purged volunteer records");
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn new_follow_up(
        &self,
        observation_id: Option<Uuid>,
        participant: &str,
        event: &str,
        signal: Signal,
        rating: Rating,
        notes: &str,
        assignee: Assignee,
        now: Timestamp,
    ) -> FollowUp {
        FollowUp {
            id: Uuid::new_v4(),
            volunteer_id: self.owner.clone(),
            observation_id,
            participant: participant.to_string(),
            event: event.to_string(),
            signal,
            rating,
            notes: notes.to_string(),
            assignee,
            status: FollowUpStatus::Pending,
            created_at: now,
            updated_at: now,
            completed_at: None,
            messages: Vec::new(),
        }
    }
}

/// Returns the trimmed value, or a validation error naming the field.
fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TriageError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn invalid(e: impl ToString) -> TriageError {
    TriageError::Validation(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::Record;
    use crate::storage::{KeyValueStore, MemoryStore, Storage};

    /// Fails every write to one key.
    struct RejectingStore {
        inner: MemoryStore,
        key: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        fn get(&self, key: &str) -> crate::storage::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> crate::storage::Result<()> {
            if key == self.key {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.set(key, value)
        }
    }

    fn form(participant: &str, mood: &str, rating: &str) -> ObservationForm {
        ObservationForm {
            participant: participant.into(),
            event: "Tai Chi".into(),
            mood: mood.into(),
            rating: rating.into(),
            notes: String::new(),
            request_followup: false,
        }
    }

    fn checkin(concern: &str) -> CheckinForm {
        CheckinForm {
            participant: "Mr. Lee".into(),
            event: "Garden Club".into(),
            energy: "low".into(),
            concern: concern.into(),
            notes: "Seemed tired after lunch".into(),
        }
    }

    #[test]
    fn escalation_rules() {
        let r = |v: u8| Rating::try_from(v).unwrap();
        assert_eq!(escalate(Mood::Calm, r(1), false), Some(Assignee::AutomatedAssistant));
        assert_eq!(escalate(Mood::Calm, r(2), true), Some(Assignee::AutomatedAssistant));
        assert_eq!(escalate(Mood::Distressed, r(5), false), Some(Assignee::AutomatedAssistant));
        assert_eq!(escalate(Mood::Calm, r(3), true), Some(Assignee::HumanVolunteer));
        assert_eq!(escalate(Mood::Joyful, r(3), false), None);
    }

    #[test]
    fn low_rating_creates_one_assistant_follow_up() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");

        for rating in ["1", "2"] {
            let submission = triage.submit_observation(&form("Mrs. Chan", "Calm", rating)).unwrap();
            let follow_up = submission.follow_up.unwrap();
            assert_eq!(follow_up.assignee, Assignee::AutomatedAssistant);
            assert_eq!(follow_up.status, FollowUpStatus::Pending);
            assert_eq!(follow_up.observation_id, Some(submission.observation.id));
        }
        assert_eq!(triage.follow_ups().unwrap().len(), 2);
    }

    #[test]
    fn passing_rating_without_request_creates_nothing() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");

        for rating in ["3", "4", "5"] {
            let submission = triage.submit_observation(&form("Mrs. Chan", "Engaged", rating)).unwrap();
            assert!(submission.follow_up.is_none());
        }
        assert!(triage.follow_ups().unwrap().is_empty());
        assert_eq!(triage.observations().unwrap().len(), 3);
    }

    #[test]
    fn alert_mood_escalates_despite_passing_rating() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");

        let submission = triage.submit_observation(&form("Mrs. Chan", "Anxious", "4")).unwrap();

        let follow_ups = triage.follow_ups().unwrap();
        assert_eq!(follow_ups.len(), 1);
        assert_eq!(follow_ups[0].assignee, Assignee::AutomatedAssistant);
        assert_eq!(follow_ups[0].status, FollowUpStatus::Pending);
        assert_eq!(follow_ups[0].signal, Signal::Mood(Mood::Anxious));
        assert_eq!(submission.follow_up.as_ref(), Some(&follow_ups[0]));
    }

    #[test]
    fn explicit_request_goes_to_volunteer() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let mut f = form("Mr. Lee", "Quiet", "4");
        f.request_followup = true;

        let follow_up = triage.submit_observation(&f).unwrap().follow_up.unwrap();
        assert_eq!(follow_up.assignee, Assignee::HumanVolunteer);
    }

    #[test]
    fn risk_signal_wins_over_explicit_request() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let mut f = form("Mr. Lee", "Distressed", "1");
        f.request_followup = true;

        triage.submit_observation(&f).unwrap();
        let follow_ups = triage.follow_ups().unwrap();
        assert_eq!(follow_ups.len(), 1);
        assert_eq!(follow_ups[0].assignee, Assignee::AutomatedAssistant);
    }

    #[test]
    fn invalid_observation_persists_nothing() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");

        let cases = [
            form("", "Calm", "3"),
            form("Mrs. Chan", "", "3"),
            form("Mrs. Chan", "Calm", ""),
            form("Mrs. Chan", "Calm", "0"),
            form("Mrs. Chan", "Calm", "6"),
            form("Mrs. Chan", "Calm", "three"),
            form("Mrs. Chan", "Sleepy", "3"),
            ObservationForm {
                event: "   ".into(),
                ..form("Mrs. Chan", "Calm", "3")
            },
        ];
        for case in &cases {
            let err = triage.submit_observation(case).unwrap_err();
            assert!(matches!(err, TriageError::Validation(_)), "{case:?}");
        }
        assert!(triage.observations().unwrap().is_empty());
        assert!(store.get(Observation::KEY).unwrap().is_none());
    }

    #[test]
    fn observation_fields_are_trimmed() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let mut f = form("  Mrs. Chan ", "calm", " 4 ");
        f.notes = "  enjoyed it  ".into();

        let obs = triage.submit_observation(&f).unwrap().observation;
        assert_eq!(obs.participant, "Mrs. Chan");
        assert_eq!(obs.mood, Mood::Calm);
        assert_eq!(obs.rating.value(), 4);
        assert_eq!(obs.notes, "enjoyed it");
    }

    #[test]
    fn checkin_always_logs_history() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");

        let result = triage.submit_checkin(&checkin("no-concerns")).unwrap();
        assert!(result.follow_up.is_none());
        assert_eq!(result.entry.title, "Mr. Lee • Wellbeing check");
        assert_eq!(result.entry.summary, "Energy: low · Concern: no-concerns");
        assert_eq!(result.entry.details, "Seemed tired after lunch");
        assert_eq!(triage.history().unwrap(), vec![result.entry]);
    }

    #[test]
    fn flagged_checkin_joins_volunteer_queue() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");

        for concern in ["needs-immediate-followup", "requests-wellness-resources"] {
            let follow_up = triage.submit_checkin(&checkin(concern)).unwrap().follow_up.unwrap();
            assert_eq!(follow_up.assignee, Assignee::HumanVolunteer);
            assert_eq!(follow_up.status, FollowUpStatus::Pending);
            assert_eq!(follow_up.rating, Rating::NEUTRAL);
            assert_eq!(follow_up.observation_id, None);
        }
        assert_eq!(triage.active_queue().unwrap().len(), 2);
        assert!(triage.observations().unwrap().is_empty());
    }

    #[test]
    fn checkin_requires_fields() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");

        let mut missing_participant = checkin("no-concerns");
        missing_participant.participant = String::new();
        let mut blank_event = checkin("no-concerns");
        blank_event.event = "   ".into();
        let mut missing_energy = checkin("no-concerns");
        missing_energy.energy = String::new();

        for case in [
            missing_participant,
            blank_event,
            missing_energy,
            checkin("worried"),
            checkin(""),
        ] {
            assert!(matches!(
                triage.submit_checkin(&case).unwrap_err(),
                TriageError::Validation(_)
            ));
        }
        assert!(triage.history().unwrap().is_empty());
    }

    #[test]
    fn checkin_follow_up_can_be_resolved_directly() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let id = triage
            .submit_checkin(&checkin("needs-immediate-followup"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;

        let resolved = triage.resolve_followup(id).unwrap();
        assert_eq!(resolved.status, FollowUpStatus::Completed);
    }

    #[test]
    fn encouragement_logged_to_history() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");

        let entry = triage.log_encouragement("Mrs. Chan", "Lovely to see you!").unwrap();
        assert_eq!(entry.title, "Mrs. Chan • Encouragement sent");
        assert_eq!(entry.summary, "Encouragement shared");
        assert_eq!(entry.details, "Lovely to see you!");

        assert!(matches!(
            triage.log_encouragement("Mrs. Chan", "  ").unwrap_err(),
            TriageError::Validation(_)
        ));
        assert_eq!(triage.history().unwrap().len(), 1);
    }

    #[test]
    fn assistant_messages_move_to_ai_contacted() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let id = triage
            .submit_observation(&form("Mrs. Chan", "Calm", "1"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;

        let after_first = triage.record_ai_message(id, "Checking in on you").unwrap();
        assert_eq!(after_first.status, FollowUpStatus::AiContacted);
        assert_eq!(after_first.messages.len(), 1);
        assert_eq!(after_first.messages[0].sender, Sender::Assistant);
        assert_eq!(after_first.messages[0].text, "Checking in on you");

        let after_second = triage.record_ai_message(id, "How was your evening?").unwrap();
        assert_eq!(after_second.status, FollowUpStatus::AiContacted);
        assert_eq!(after_second.messages.len(), 2);
        assert_eq!(triage.follow_up(id).unwrap(), after_second);
    }

    #[test]
    fn blank_message_is_rejected() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let id = triage
            .submit_observation(&form("Mrs. Chan", "Calm", "1"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;

        assert!(matches!(
            triage.record_ai_message(id, " \n ").unwrap_err(),
            TriageError::EmptyMessage
        ));
        let follow_up = triage.follow_up(id).unwrap();
        assert_eq!(follow_up.status, FollowUpStatus::Pending);
        assert!(follow_up.messages.is_empty());
    }

    #[test]
    fn unknown_or_foreign_follow_up_is_not_found() {
        let store = MemoryStore::new();
        let ana = Triage::new(&store, "ana");
        let ben = Triage::new(&store, "ben");
        let id = ana
            .submit_observation(&form("Mrs. Chan", "Calm", "1"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;

        assert!(matches!(
            ben.record_ai_message(id, "hello").unwrap_err(),
            TriageError::NotFound(found) if found == id
        ));
        assert!(matches!(
            ben.resolve_followup(id).unwrap_err(),
            TriageError::NotFound(_)
        ));
        assert!(matches!(
            ana.resolve_followup(Uuid::new_v4()).unwrap_err(),
            TriageError::NotFound(_)
        ));
        assert_eq!(ana.follow_up(id).unwrap().status, FollowUpStatus::Pending);
    }

    #[test]
    fn resolve_sets_completion_and_notes_it() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let id = triage
            .submit_observation(&form("Mrs. Chan", "Calm", "1"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;
        triage.record_ai_message(id, "Checking in on you").unwrap();

        let resolved = triage.resolve_followup(id).unwrap();
        assert_eq!(resolved.status, FollowUpStatus::Completed);
        assert!(resolved.completed_at.is_some());
        let last = resolved.messages.last().unwrap();
        assert_eq!(last.sender, Sender::System);
        assert_eq!(last.text, RESOLVED_MESSAGE);
    }

    #[test]
    fn resolving_twice_keeps_original_completion() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let id = triage
            .submit_observation(&form("Mrs. Chan", "Calm", "2"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;

        let first = triage.resolve_followup(id).unwrap();
        let second = triage.resolve_followup(id).unwrap();

        assert_eq!(second.completed_at, first.completed_at);
        assert_eq!(second, first);
        assert_eq!(triage.follow_up(id).unwrap().messages.len(), 1);
    }

    #[test]
    fn completed_follow_up_rejects_messages() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let id = triage
            .submit_observation(&form("Mrs. Chan", "Calm", "2"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;
        let resolved = triage.resolve_followup(id).unwrap();

        assert!(matches!(
            triage.record_ai_message(id, "Are you there?").unwrap_err(),
            TriageError::TerminalState(found) if found == id
        ));
        assert_eq!(triage.follow_up(id).unwrap().messages, resolved.messages);
    }

    #[test]
    fn queue_puts_pending_first_and_hides_completed() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let ids: Vec<Uuid> = ["A", "B", "C", "D"]
            .iter()
            .map(|name| {
                triage
                    .submit_observation(&form(name, "Calm", "1"))
                    .unwrap()
                    .follow_up
                    .unwrap()
                    .id
            })
            .collect();
        triage.record_ai_message(ids[0], "hi").unwrap();
        triage.resolve_followup(ids[1]).unwrap();

        let queue: Vec<String> = triage
            .active_queue()
            .unwrap()
            .into_iter()
            .map(|f| f.participant)
            .collect();
        assert_eq!(queue, vec!["C", "D", "A"]);
    }

    #[test]
    fn assistant_selection_excludes_volunteer_and_completed() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let mut requested = form("Volunteer case", "Calm", "4");
        requested.request_followup = true;
        triage.submit_observation(&requested).unwrap();
        triage.submit_checkin(&checkin("needs-immediate-followup")).unwrap();
        let done = triage
            .submit_observation(&form("Done", "Anxious", "3"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;
        triage.resolve_followup(done).unwrap();
        triage.submit_observation(&form("Open", "Distressed", "3")).unwrap();

        let selection = triage.pending_assistant_followups().unwrap();
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].participant, "Open");
    }

    #[test]
    fn counts_after_mixed_submissions() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        triage.submit_observation(&form("A", "Calm", "1")).unwrap();
        triage.submit_observation(&form("B", "Calm", "1")).unwrap();
        triage.submit_observation(&form("C", "Calm", "5")).unwrap();

        assert_eq!(
            triage.counts().unwrap(),
            Counts {
                observations: 3,
                open_follow_ups: 2,
                completed_follow_ups: 0,
                assistant_follow_ups: 2,
            }
        );
    }

    #[test]
    fn counts_track_resolution() {
        let store = MemoryStore::new();
        let triage = Triage::new(&store, "ana");
        let id = triage
            .submit_observation(&form("A", "Calm", "1"))
            .unwrap()
            .follow_up
            .unwrap()
            .id;
        triage.resolve_followup(id).unwrap();

        let counts = triage.counts().unwrap();
        assert_eq!(counts.open_follow_ups, 0);
        assert_eq!(counts.completed_follow_ups, 1);
        assert_eq!(counts.assistant_follow_ups, 1);
    }

    #[test]
    fn reads_are_owner_scoped() {
        let store = MemoryStore::new();
        let ana = Triage::new(&store, "ana");
        let ben = Triage::new(&store, "ben");
        ana.submit_observation(&form("A", "Calm", "1")).unwrap();

        assert!(ben.observations().unwrap().is_empty());
        assert!(ben.active_queue().unwrap().is_empty());
        assert_eq!(ben.counts().unwrap(), Counts::default());
    }

    #[test]
    fn purge_leaves_other_owners_byte_for_byte() {
        let store = MemoryStore::new();
        let ana = Triage::new(&store, "ana");
        let ben = Triage::new(&store, "ben");

        ben.submit_observation(&form("B1", "Calm", "1")).unwrap();
        ben.submit_checkin(&checkin("needs-immediate-followup")).unwrap();
        ben.log_encouragement("B1", "Keep going").unwrap();
        ana.submit_observation(&form("A1", "Calm", "2")).unwrap();
        ana.submit_checkin(&checkin("requests-wellness-resources")).unwrap();
        ana.log_encouragement("A1", "Well done").unwrap();

        let ben_json = |store: &MemoryStore| {
            (
                serde_json::to_string(&store.list_by_owner::<Observation>("ben").unwrap()).unwrap(),
                serde_json::to_string(&store.list_by_owner::<FollowUp>("ben").unwrap()).unwrap(),
                serde_json::to_string(&store.list_by_owner::<HistoryEntry>("ben").unwrap()).unwrap(),
            )
        };
        let before = ben_json(&store);

        ana.purge_owner_data().unwrap();

        assert!(ana.observations().unwrap().is_empty());
        assert!(ana.follow_ups().unwrap().is_empty());
        assert!(ana.history().unwrap().is_empty());
        assert_eq!(ben_json(&store), before);
    }

    #[test]
    fn failed_escalation_rolls_back_observation() {
        let store = RejectingStore {
            inner: MemoryStore::new(),
            key: FollowUp::KEY,
        };
        let triage = Triage::new(&store, "ana");

        let err = triage.submit_observation(&form("Mrs. Chan", "Calm", "1"));
        assert!(matches!(err, Err(TriageError::Storage(_))));
        assert!(triage.observations().unwrap().is_empty());

        triage.submit_observation(&form("Mr. Lee", "Calm", "4")).unwrap();
        assert_eq!(triage.observations().unwrap().len(), 1);
    }

    #[test]
    fn failed_escalation_rolls_back_checkin() {
        let store = RejectingStore {
            inner: MemoryStore::new(),
            key: FollowUp::KEY,
        };
        let triage = Triage::new(&store, "ana");

        let err = triage.submit_checkin(&checkin("needs-immediate-followup"));
        assert!(matches!(err, Err(TriageError::Storage(_))));
        assert!(triage.history().unwrap().is_empty());
    }

    #[test]
    fn unreadable_foreign_follow_up_survives_writes() {
        let store = MemoryStore::new();
        let ana = Triage::new(&store, "ana");
        let ben = Triage::new(&store, "ben");
        let ben_follow_up = ben
            .submit_observation(&form("B1", "Calm", "2"))
            .unwrap()
            .follow_up
            .unwrap();

        let mut broken = serde_json::to_value(&ben_follow_up).unwrap();
        broken["id"] = serde_json::json!(Uuid::new_v4());
        broken["volunteerId"] = serde_json::json!("cai");
        broken["rating"] = serde_json::json!(9);
        let raw = serde_json::to_string(&vec![
            serde_json::to_value(&ben_follow_up).unwrap(),
            broken,
        ])
        .unwrap();
        store.set(FollowUp::KEY, &raw).unwrap();

        ana.submit_observation(&form("A1", "Calm", "1")).unwrap();
        assert_eq!(ben.follow_ups().unwrap(), vec![ben_follow_up.clone()]);

        ana.purge_owner_data().unwrap();
        assert_eq!(ben.follow_ups().unwrap(), vec![ben_follow_up]);
        let stored: Vec<serde_json::Value> =
            serde_json::from_str(&store.get(FollowUp::KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn sqlite_round_trip_submit_resolve_purge() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.sqlite");

        let id = {
            let storage = Storage::open(&path).unwrap();
            let ana = Triage::new(&storage, "ana");
            let ben = Triage::new(&storage, "ben");
            ben.submit_observation(&form("B1", "Calm", "5")).unwrap();
            let id = ana
                .submit_observation(&form("Mrs. Chan", "Anxious", "4"))
                .unwrap()
                .follow_up
                .unwrap()
                .id;
            ana.record_ai_message(id, "Checking in on you").unwrap();
            ana.resolve_followup(id).unwrap();
            id
        };

        let storage = Storage::open(&path).unwrap();
        let ana = Triage::new(&storage, "ana");
        let resolved = ana.follow_up(id).unwrap();
        assert_eq!(resolved.status, FollowUpStatus::Completed);
        assert_eq!(resolved.messages.len(), 2);
        assert_eq!(ana.counts().unwrap().completed_follow_ups, 1);

        ana.purge_owner_data().unwrap();
        assert!(ana.observations().unwrap().is_empty());
        assert!(ana.follow_ups().unwrap().is_empty());
        assert_eq!(
            Triage::new(&storage, "ben").observations().unwrap().len(),
            1
        );
    }
}
