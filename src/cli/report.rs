//! Reporting commands: log, stats, export, purge.

use std::{fs, path::Path};

use jiff::Timestamp;

use crate::{export, storage::Repository, triage::Triage};

use super::format::{format_counts, format_history_line, format_observation_line};

pub(super) fn cmd_log<R: Repository>(triage: &Triage<'_, R>) -> Result<(), String> {
    let observations = triage
        .observations()
        .map_err(|e| format!("failed to load observations: {e}"))?;
    let history = triage
        .history()
        .map_err(|e| format!("failed to load history: {e}"))?;

    println!("Observations:");
    if observations.is_empty() {
        println!("  none yet");
    }
    for o in observations.iter().rev() {
        println!("{}", format_observation_line(o));
    }

    println!();
    println!("History:");
    if history.is_empty() {
        println!("  none yet");
    }
    for h in history.iter().rev() {
        println!("{}", format_history_line(h));
    }

    Ok(())
}

pub(super) fn cmd_stats<R: Repository>(triage: &Triage<'_, R>) -> Result<(), String> {
    let counts = triage
        .counts()
        .map_err(|e| format!("failed to count records: {e}"))?;
    println!("{}", format_counts(&counts));
    Ok(())
}

pub(super) fn cmd_export<R: Repository>(
    triage: &Triage<'_, R>,
    out: Option<&Path>,
) -> Result<(), String> {
    let observations = triage
        .observations()
        .map_err(|e| format!("failed to load observations: {e}"))?;
    let follow_ups = triage
        .follow_ups()
        .map_err(|e| format!("failed to load follow-ups: {e}"))?;

    let text = export::summary(triage.owner(), Timestamp::now(), &observations, &follow_ups);

    match out {
        Some(path) => {
            fs::write(path, &text)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!("Summary written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub(super) fn cmd_purge<R: Repository>(triage: &Triage<'_, R>, yes: bool) -> Result<(), String> {
    if !yes {
        return Err(format!(
            "purge removes every record kept for '{}' and cannot be undone; \
             re-run with --yes to confirm",
            triage.owner()
        ));
    }
    triage
        .purge_owner_data()
        .map_err(|e| format!("failed to purge records: {e}"))?;
    eprintln!("Removed all records for {}", triage.owner());
    Ok(())
}
