//! Recording commands: observe, checkin, encourage.

use crate::{
    model::{CheckinForm, FollowUp, ObservationForm},
    storage::Repository,
    triage::Triage,
};

use super::format::short_id;

pub(super) fn cmd_observe<R: Repository>(
    triage: &Triage<'_, R>,
    form: &ObservationForm,
) -> Result<(), String> {
    let submission = triage
        .submit_observation(form)
        .map_err(|e| format!("failed to record observation: {e}"))?;

    let obs = &submission.observation;
    println!(
        "Recorded {} at {}: {} ({})",
        obs.participant,
        obs.event,
        obs.rating,
        obs.rating.description()
    );
    report_follow_up(submission.follow_up.as_ref());
    Ok(())
}

pub(super) fn cmd_checkin<R: Repository>(
    triage: &Triage<'_, R>,
    form: &CheckinForm,
) -> Result<(), String> {
    let checkin = triage
        .submit_checkin(form)
        .map_err(|e| format!("failed to record check-in: {e}"))?;

    println!("Recorded {}", checkin.entry.title);
    report_follow_up(checkin.follow_up.as_ref());
    Ok(())
}

pub(super) fn cmd_encourage<R: Repository>(
    triage: &Triage<'_, R>,
    participant: &str,
    message: &str,
) -> Result<(), String> {
    let entry = triage
        .log_encouragement(participant, message)
        .map_err(|e| format!("failed to record encouragement: {e}"))?;

    println!("Recorded {}", entry.title);
    Ok(())
}

fn report_follow_up(follow_up: Option<&FollowUp>) {
    if let Some(f) = follow_up {
        println!(
            "Follow-up {} created for the {}",
            short_id(f.id),
            f.assignee.label().replace('-', " ")
        );
    }
}
