//! Plain-text volunteer summary.

use jiff::Timestamp;

use crate::model::{FollowUp, Observation};

/// Formats a summary of a volunteer's observations and follow-ups.
pub fn summary(
    owner: &str,
    generated_at: Timestamp,
    observations: &[Observation],
    follow_ups: &[FollowUp],
) -> String {
    let mut lines = vec![
        "ElderConnect Volunteer Summary".to_string(),
        format!("Volunteer: {owner}"),
        format!("Generated: {generated_at}"),
        String::new(),
        "Observations:".to_string(),
    ];
    lines.extend(observations.iter().map(|o| {
        format!(
            "- {} • {} • Mood: {} • Rating: {}",
            o.participant, o.event, o.mood, o.rating
        )
    }));
    lines.push(String::new());
    lines.push("Follow-ups:".to_string());
    lines.extend(follow_ups.iter().map(|f| {
        format!(
            "- {} • {} • Assigned to: {} • Status: {}",
            f.participant,
            f.event,
            f.assignee.label(),
            f.status.label()
        )
    }));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
