use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionKind;

/// Why a cycle was wiped back to the configuration screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetReason {
    /// The user pressed stop.
    Stopped,
    /// The "session ended" hold ran out after the last round.
    Completed,
}

/// Every state change in the timer produces an Event.
/// The host logs or prints them; nothing in the core consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RoundsChanged {
        rounds_total: u32,
        focus_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        at: DateTime<Utc>,
    },
    SessionStarted {
        kind: SessionKind,
        round: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A countdown expired and the next session began.
    SessionAdvanced {
        from: SessionKind,
        to: SessionKind,
        round: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    CycleReset {
        reason: ResetReason,
        at: DateTime<Utc>,
    },
    /// Back on the configuration screen with rounds left intact.
    ReturnedToConfig {
        round: u32,
        at: DateTime<Utc>,
    },
}
