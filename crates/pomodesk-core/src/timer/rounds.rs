//! Round-derived session configuration.
//!
//! The user only ever picks a round count. Every other number is derived
//! from it: one 25-minute focus block per round, a 40-minute long break for
//! every complete group of four rounds, and a 5-minute short break for each
//! remaining round.

use serde::{Deserialize, Serialize};

use super::session::SessionKind;

/// Focus minutes contributed by each round.
pub const FOCUS_MINUTES_PER_ROUND: u32 = 25;
/// Length of one short break.
pub const SHORT_BREAK_MINUTES: u32 = 5;
/// Length of one long break.
pub const LONG_BREAK_MINUTES: u32 = 40;
/// A long break is earned after this many rounds.
pub const ROUNDS_PER_LONG_BREAK: u32 = 4;

/// Cycle totals shown on the configuration screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub rounds_total: u32,
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
}

impl SessionConfig {
    /// Derive the configuration for `rounds` rounds (clamped to at least 1).
    pub fn for_rounds(rounds: u32) -> Self {
        let rounds_total = rounds.max(1);
        let long_break_minutes = (rounds_total / ROUNDS_PER_LONG_BREAK) * LONG_BREAK_MINUTES;
        let long_breaks = long_break_minutes / LONG_BREAK_MINUTES;
        Self {
            rounds_total,
            focus_minutes: FOCUS_MINUTES_PER_ROUND.saturating_mul(rounds_total),
            short_break_minutes: (rounds_total - long_breaks).saturating_mul(SHORT_BREAK_MINUTES),
            long_break_minutes,
        }
    }

    pub fn incremented(&self) -> Self {
        Self::for_rounds(self.rounds_total.saturating_add(1))
    }

    /// One round fewer, never below a single round.
    pub fn decremented(&self) -> Self {
        Self::for_rounds(self.rounds_total.saturating_sub(1))
    }

    /// Length in seconds of a single session of `kind`.
    ///
    /// `Ended` is a display-only state and has no configured length here;
    /// the session machine supplies its own hold time for it.
    pub fn session_secs(&self, kind: SessionKind) -> Option<u64> {
        let minutes = match kind {
            SessionKind::Focus => FOCUS_MINUTES_PER_ROUND,
            SessionKind::ShortBreak => SHORT_BREAK_MINUTES,
            SessionKind::LongBreak => LONG_BREAK_MINUTES,
            SessionKind::Ended => return None,
        };
        Some(u64::from(minutes) * 60)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_rounds(1)
    }
}
