//! Output formatting for CLI display.

use uuid::Uuid;

use crate::model::{FollowUp, HistoryEntry, Observation, Sender};
use crate::triage::Counts;

/// The first eight hex digits of an id.
pub(super) fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// One line per follow-up in a queue listing.
pub(super) fn format_follow_up_line(f: &FollowUp) -> String {
    format!(
        "{}  [{}] [{}]  {} • {} • {} • {}",
        short_id(f.id),
        f.status.label(),
        f.assignee.label(),
        f.participant,
        f.event,
        f.signal,
        f.rating
    )
}

/// The full detail view of a follow-up, including its message thread.
pub(super) fn format_follow_up_detail(f: &FollowUp) -> String {
    let mut lines = vec![
        format!("Follow-up {}", f.id),
        format!("Participant: {}", f.participant),
        format!("Event: {}", f.event),
        format!("{}: {}  |  Rating: {}", f.signal.kind_label(), f.signal, f.rating),
        format!("Assigned to: {}", f.assignee.label()),
        format!("Status: {}", f.status.label()),
        format!("Created: {}", f.created_at),
    ];
    if let Some(at) = f.completed_at {
        lines.push(format!("Completed: {at}"));
    }
    if !f.notes.is_empty() {
        lines.push(format!("Notes: {}", f.notes));
    }
    if !f.messages.is_empty() {
        lines.push(String::new());
        lines.push("Messages:".to_string());
        for m in &f.messages {
            let sender = match m.sender {
                Sender::Assistant => "Assistant",
                Sender::System => "System",
            };
            lines.push(format!("  [{}] {sender}: {}", m.sent_at, m.text));
        }
    }
    lines.join("\n")
}

pub(super) fn format_observation_line(o: &Observation) -> String {
    let mut line = format!(
        "{}  {} • {} • Mood: {} • Rating: {}",
        o.created_at, o.participant, o.event, o.mood, o.rating
    );
    if !o.notes.is_empty() {
        line.push_str(&format!("\n    {}", o.notes));
    }
    line
}

pub(super) fn format_history_line(h: &HistoryEntry) -> String {
    let mut line = format!("{}  {} • {}", h.created_at, h.title, h.summary);
    if !h.details.is_empty() {
        line.push_str(&format!("\n    {}", h.details));
    }
    line
}

pub(super) fn format_counts(c: &Counts) -> String {
    [
        format!("Observations:             {}", c.observations),
        format!("Open follow-ups:          {}", c.open_follow_ups),
        format!("Completed follow-ups:     {}", c.completed_follow_ups),
        format!("Assistant follow-ups:     {}", c.assistant_follow_ups),
    ]
    .join("\n")
}
