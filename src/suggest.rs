//! Suggested assistant messages for a follow-up, keyed on its mood snapshot.

use crate::model::{FollowUp, Mood, Signal};

const DISTRESSED: &str = "Hi {name}, I noticed the last session felt heavy. I'm here to listen. \
    Would you like to share what would feel comforting right now?";
const ANXIOUS: &str = "Hi {name}, I sensed some worries after the event. Together we can take \
    one gentle step at a time. Would a breathing exercise or a friendly call help today?";
const QUIET: &str = "Hello {name}, thank you for joining us. I'm checking in to see how you're \
    feeling and if there's anything we can do to make the next session feel easier.";
const DEFAULT: &str = "Hello {name}, we appreciate your presence. If anything felt overwhelming, \
    I'm here to offer support and companionship.";

/// Drafts an opening message for the automated assistant to send.
pub fn suggest_message(follow_up: &FollowUp) -> String {
    let template = match follow_up.signal {
        Signal::Mood(Mood::Distressed) => DISTRESSED,
        Signal::Mood(Mood::Anxious) => ANXIOUS,
        Signal::Mood(Mood::Quiet) => QUIET,
        Signal::Mood(_) | Signal::Concern(_) => DEFAULT,
    };
    template.replace("{name}", &follow_up.participant)
}
