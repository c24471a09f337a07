//! CLI interface for `ElderConnect`.
//!
//! Each subcommand is non-interactive: arguments in, plain text out.
//! Every command acts on behalf of one volunteer, resolved from `--as`,
//! `ELDERCONNECT_VOLUNTEER`, or the config file.
//!
//! Follow-up ids take a full UUID or an unambiguous prefix.

mod followup;
mod format;
mod record;
mod report;

use clap::{Parser, Subcommand};

use crate::{
    config::Config,
    identity,
    model::{CheckinForm, ObservationForm},
    storage::Storage,
    triage::Triage,
};

use followup::FollowUpCommand;

/// `ElderConnect`: wellbeing observations and follow-ups for volunteers.
#[derive(Debug, Parser)]
#[command(name = "elderconnect", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Volunteer to act as. Overrides `ELDERCONNECT_VOLUNTEER` and the config file.
    #[arg(long = "as", global = true)]
    volunteer: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: after an event
  1. elderconnect observe --participant "Mrs. Chan" --event "Tai Chi" --mood anxious --rating 4
     → follow-up 3f2a91c0 created for the automated assistant
  2. elderconnect followup suggest 3f2
  3. elderconnect followup message 3f2 "Hi Mrs. Chan, checking in on you"
  4. elderconnect followup resolve 3f2

Check-ins:
  elderconnect checkin --participant "Mr. Lee" --event "Garden Club" --energy low \
      --concern needs-immediate-followup"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record an engagement rating for a participant.
    ///
    /// A rating of 1–2 or an anxious/distressed mood creates a follow-up for
    /// the automated assistant. Otherwise `--request-followup` queues one for
    /// a volunteer.
    Observe {
        #[arg(long)]
        participant: String,

        #[arg(long)]
        event: String,

        /// One of: joyful, engaged, calm, quiet, tired, anxious, distressed.
        #[arg(long)]
        mood: String,

        /// 1 (critical support needed) to 5 (thriving).
        #[arg(long)]
        rating: String,

        #[arg(long, default_value = "")]
        notes: String,

        /// Ask for a volunteer to follow up in person.
        #[arg(long)]
        request_followup: bool,
    },

    /// Record a wellbeing check-in.
    ///
    /// Flagged concerns queue a volunteer follow-up.
    Checkin {
        #[arg(long)]
        participant: String,

        #[arg(long)]
        event: String,

        /// One of: high, steady, low, exhausted.
        #[arg(long)]
        energy: String,

        /// One of: no-concerns, monitor-next-session, needs-immediate-followup,
        /// requests-wellness-resources.
        #[arg(long)]
        concern: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Record an encouragement message sent to a participant.
    Encourage {
        #[arg(long)]
        participant: String,

        #[arg(long)]
        message: String,
    },

    /// Work the follow-up queue.
    #[command(name = "followup")]
    FollowUp {
        #[command(subcommand)]
        command: FollowUpCommand,
    },

    /// Show observations and history, newest first.
    Log,

    /// Show observation and follow-up counts.
    Stats,

    /// Write a plain-text summary of observations and follow-ups.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },

    /// Delete every record kept for this volunteer. Irreversible.
    Purge {
        /// Confirm the purge.
        #[arg(long)]
        yes: bool,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let volunteer = identity::resolve_volunteer(cli.volunteer.as_deref(), config)?;
    let path = config
        .store_path()
        .ok_or("could not determine home directory")?;
    let storage =
        Storage::open(&path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let triage = Triage::new(&storage, volunteer);

    match cli.command {
        Command::Observe {
            participant,
            event,
            mood,
            rating,
            notes,
            request_followup,
        } => record::cmd_observe(
            &triage,
            &ObservationForm {
                participant,
                event,
                mood,
                rating,
                notes,
                request_followup,
            },
        ),
        Command::Checkin {
            participant,
            event,
            energy,
            concern,
            notes,
        } => record::cmd_checkin(
            &triage,
            &CheckinForm {
                participant,
                event,
                energy,
                concern,
                notes,
            },
        ),
        Command::Encourage {
            participant,
            message,
        } => record::cmd_encourage(&triage, &participant, &message),
        Command::FollowUp { command } => followup::run(&triage, command),
        Command::Log => report::cmd_log(&triage),
        Command::Stats => report::cmd_stats(&triage),
        Command::Export { out } => report::cmd_export(&triage, out.as_deref()),
        Command::Purge { yes } => report::cmd_purge(&triage, yes),
    }
}
