//! Follow-up queue commands: list, assistant, show, suggest, message, resolve.

use clap::Subcommand;
use uuid::Uuid;

use crate::{
    model::FollowUp,
    storage::Repository,
    suggest::suggest_message,
    triage::Triage,
};

use super::format::{format_follow_up_detail, format_follow_up_line, short_id};

#[derive(Debug, Subcommand)]
pub enum FollowUpCommand {
    /// List open follow-ups, pending first.
    List,

    /// List open follow-ups assigned to the automated assistant.
    Assistant,

    /// Show a follow-up and its messages.
    Show {
        /// Follow-up ID: full UUID or unambiguous prefix.
        id: String,
    },

    /// Draft an assistant message for a follow-up.
    Suggest {
        /// Follow-up ID: full UUID or unambiguous prefix.
        id: String,
    },

    /// Record a message sent by the automated assistant.
    Message {
        /// Follow-up ID: full UUID or unambiguous prefix.
        id: String,

        /// Message text.
        text: String,
    },

    /// Mark a follow-up resolved.
    Resolve {
        /// Follow-up ID: full UUID or unambiguous prefix.
        id: String,
    },
}

pub(super) fn run<R: Repository>(
    triage: &Triage<'_, R>,
    command: FollowUpCommand,
) -> Result<(), String> {
    match command {
        FollowUpCommand::List => {
            let queue = triage
                .active_queue()
                .map_err(|e| format!("failed to load follow-ups: {e}"))?;
            print_list(&queue, "No open follow-ups");
            Ok(())
        }
        FollowUpCommand::Assistant => {
            let selection = triage
                .pending_assistant_followups()
                .map_err(|e| format!("failed to load follow-ups: {e}"))?;
            print_list(&selection, "No open assistant follow-ups");
            Ok(())
        }
        FollowUpCommand::Show { id } => {
            let follow_up = resolve_follow_up(triage, &id)?;
            println!("{}", format_follow_up_detail(&follow_up));
            Ok(())
        }
        FollowUpCommand::Suggest { id } => {
            let follow_up = resolve_follow_up(triage, &id)?;
            println!("{}", suggest_message(&follow_up));
            Ok(())
        }
        FollowUpCommand::Message { id, text } => {
            let follow_up = resolve_follow_up(triage, &id)?;
            let follow_up = triage
                .record_ai_message(follow_up.id, &text)
                .map_err(|e| format!("failed to record message: {e}"))?;
            eprintln!(
                "Message recorded on {} [{}]",
                short_id(follow_up.id),
                follow_up.status.label()
            );
            Ok(())
        }
        FollowUpCommand::Resolve { id } => {
            let follow_up = resolve_follow_up(triage, &id)?;
            let follow_up = triage
                .resolve_followup(follow_up.id)
                .map_err(|e| format!("failed to resolve follow-up: {e}"))?;
            eprintln!("Follow-up {} resolved", short_id(follow_up.id));
            Ok(())
        }
    }
}

fn print_list(follow_ups: &[FollowUp], empty: &str) {
    if follow_ups.is_empty() {
        println!("{empty}");
        return;
    }
    for f in follow_ups {
        println!("{}", format_follow_up_line(f));
    }
}

/// Resolve a follow-up reference (full UUID or unambiguous prefix) to an owned follow-up.
fn resolve_follow_up<R: Repository>(
    triage: &Triage<'_, R>,
    reference: &str,
) -> Result<FollowUp, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return triage.follow_up(id).map_err(|e| e.to_string());
    }

    let follow_ups = triage
        .follow_ups()
        .map_err(|e| format!("failed to load follow-ups: {e}"))?;
    let matches = match_prefix(&follow_ups, reference);

    match matches.len() {
        0 => Err(format!("no follow-up matching '{reference}'")),
        1 => Ok(matches[0].clone()),
        n => {
            let ids: Vec<String> = matches.iter().map(|f| short_id(f.id)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {n} follow-ups: {}",
                ids.join(", ")
            ))
        }
    }
}

fn match_prefix<'f>(follow_ups: &'f [FollowUp], reference: &str) -> Vec<&'f FollowUp> {
    let reference = reference.to_ascii_lowercase();
    if reference.is_empty() {
        return Vec::new();
    }
    follow_ups
        .iter()
        .filter(|f| f.id.to_string().starts_with(&reference))
        .collect()
}
