//! Session state machine.
//!
//! `TimerSession` owns the whole timer: the round-derived configuration, the
//! current session kind and round, the screen mode, the run flag and the
//! countdown. The host owns one instance, feeds it intents and timestamps,
//! and reads `snapshot()` back for rendering.
//!
//! ## Transitions (on countdown expiry)
//!
//! ```text
//! Focus(n) -> Ended                  if n >= rounds_total
//! Focus(n) -> LongBreak              if rounds_total >= 4 and n % 4 == 0
//! Focus(n) -> ShortBreak             otherwise
//! ShortBreak | LongBreak -> Focus(n + 1)
//! Ended -> (cycle reset, back to Configuring)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::countdown::{Countdown, TickMode};
use super::display::{self, DisplaySnapshot};
use super::intent::Intent;
use super::rounds::{SessionConfig, ROUNDS_PER_LONG_BREAK};
use crate::events::{Event, ResetReason};

/// Seconds the "Session Ended!" screen stays up before the cycle resets.
pub const DEFAULT_ENDED_DISPLAY_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Focus,
    ShortBreak,
    LongBreak,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenMode {
    /// Pre-start screen where the round count is adjusted.
    Configuring,
    /// Countdown visible, running or paused.
    Active,
}

/// Read-only copy of the timer state handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub kind: SessionKind,
    pub current_round: u32,
    pub remaining_seconds: u64,
    pub running: bool,
    pub screen_mode: ScreenMode,
}

/// Result of the transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next { kind: SessionKind, round: u32 },
    /// The terminal display has timed out; wipe the cycle.
    Finished,
}

/// Pick the session that follows `kind` in round `round`.
pub fn next_session(kind: SessionKind, round: u32, config: &SessionConfig) -> Transition {
    match kind {
        SessionKind::Focus if round >= config.rounds_total => Transition::Next {
            kind: SessionKind::Ended,
            round,
        },
        SessionKind::Focus => {
            let long = config.rounds_total >= ROUNDS_PER_LONG_BREAK
                && round % ROUNDS_PER_LONG_BREAK == 0;
            Transition::Next {
                kind: if long {
                    SessionKind::LongBreak
                } else {
                    SessionKind::ShortBreak
                },
                round,
            }
        }
        SessionKind::ShortBreak | SessionKind::LongBreak => Transition::Next {
            kind: SessionKind::Focus,
            round: round.saturating_add(1),
        },
        SessionKind::Ended => Transition::Finished,
    }
}

/// Host-tunable knobs that do not change the round formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerOptions {
    pub tick_mode: TickMode,
    pub ended_display_secs: u64,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            tick_mode: TickMode::default(),
            ended_display_secs: DEFAULT_ENDED_DISPLAY_SECS,
        }
    }
}

/// The timer aggregate.
#[derive(Debug, Clone)]
pub struct TimerSession {
    options: TimerOptions,
    config: SessionConfig,
    kind: SessionKind,
    current_round: u32,
    running: bool,
    screen_mode: ScreenMode,
    countdown: Countdown,
}

impl TimerSession {
    /// Fresh timer on the configuration screen.
    pub fn new(options: TimerOptions) -> Self {
        let mut session = Self {
            options,
            config: SessionConfig::default(),
            kind: SessionKind::Focus,
            current_round: 1,
            running: false,
            screen_mode: ScreenMode::Configuring,
            countdown: Countdown::new(options.tick_mode),
        };
        session.begin(SessionKind::Focus);
        session
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            kind: self.kind,
            current_round: self.current_round,
            remaining_seconds: self.countdown.remaining_secs(),
            running: self.running,
            screen_mode: self.screen_mode,
        }
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        display::project(&self.state(), &self.config)
    }

    /// Length of a session of `kind` under the current configuration.
    pub fn duration_secs(&self, kind: SessionKind) -> u64 {
        self.config
            .session_secs(kind)
            .unwrap_or(self.options.ended_display_secs)
    }

    // ── Intents ──────────────────────────────────────────────────────

    pub fn apply(&mut self, intent: Intent) -> Option<Event> {
        debug!(?intent, mode = ?self.screen_mode, "intent");
        match intent {
            Intent::Increment => self.increment_rounds(),
            Intent::Decrement => self.decrement_rounds(),
            Intent::Start => self.press_start(),
            Intent::Stop => self.press_stop(),
            Intent::Reset => self.press_reset(),
        }
    }

    pub fn increment_rounds(&mut self) -> Option<Event> {
        let next = self.config.incremented();
        self.set_config(next)
    }

    pub fn decrement_rounds(&mut self) -> Option<Event> {
        let next = self.config.decremented();
        self.set_config(next)
    }

    pub fn press_start(&mut self) -> Option<Event> {
        match self.screen_mode {
            ScreenMode::Configuring => {
                self.screen_mode = ScreenMode::Active;
                self.current_round = 1;
                let duration_secs = self.begin(SessionKind::Focus);
                self.running = true;
                Some(Event::SessionStarted {
                    kind: SessionKind::Focus,
                    round: 1,
                    duration_secs,
                    at: Utc::now(),
                })
            }
            ScreenMode::Active => {
                self.running = !self.running;
                // Re-anchored on the next running tick.
                self.countdown.suspend();
                let remaining_secs = self.countdown.remaining_secs();
                Some(if self.running {
                    Event::TimerResumed {
                        remaining_secs,
                        at: Utc::now(),
                    }
                } else {
                    Event::TimerPaused {
                        remaining_secs,
                        at: Utc::now(),
                    }
                })
            }
        }
    }

    pub fn press_stop(&mut self) -> Option<Event> {
        self.reset_cycle();
        Some(Event::CycleReset {
            reason: ResetReason::Stopped,
            at: Utc::now(),
        })
    }

    /// Back to the configuration screen, keeping rounds and config.
    pub fn press_reset(&mut self) -> Option<Event> {
        self.screen_mode = ScreenMode::Configuring;
        self.running = false;
        self.countdown.suspend();
        Some(Event::ReturnedToConfig {
            round: self.current_round,
            at: Utc::now(),
        })
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Call once per frame. Returns an event when a session boundary is crossed.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if self.screen_mode != ScreenMode::Active {
            return None;
        }
        self.countdown.tick(now_ms, self.running);
        if !self.running || !self.countdown.is_expired() {
            return None;
        }
        Some(self.advance(now_ms))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_config(&mut self, next: SessionConfig) -> Option<Event> {
        if self.screen_mode != ScreenMode::Configuring || next == self.config {
            return None;
        }
        self.config = next;
        debug!(rounds = next.rounds_total, "rounds changed");
        Some(Event::RoundsChanged {
            rounds_total: next.rounds_total,
            focus_minutes: next.focus_minutes,
            short_break_minutes: next.short_break_minutes,
            long_break_minutes: next.long_break_minutes,
            at: Utc::now(),
        })
    }

    /// Switch to `kind` and load its duration. Returns that duration.
    fn begin(&mut self, kind: SessionKind) -> u64 {
        let duration_secs = self.duration_secs(kind);
        self.kind = kind;
        self.countdown.start(duration_secs);
        duration_secs
    }

    fn advance(&mut self, now_ms: u64) -> Event {
        let from = self.kind;
        match next_session(from, self.current_round, &self.config) {
            Transition::Next { kind, round } => {
                self.current_round = round;
                let duration_secs = self.begin(kind);
                self.countdown.anchor(now_ms);
                debug!(?from, to = ?kind, round, "session advanced");
                Event::SessionAdvanced {
                    from,
                    to: kind,
                    round,
                    duration_secs,
                    at: Utc::now(),
                }
            }
            Transition::Finished => {
                info!(rounds = self.config.rounds_total, "cycle complete");
                self.reset_cycle();
                Event::CycleReset {
                    reason: ResetReason::Completed,
                    at: Utc::now(),
                }
            }
        }
    }

    fn reset_cycle(&mut self) {
        self.config = SessionConfig::default();
        self.current_round = 1;
        self.running = false;
        self.screen_mode = ScreenMode::Configuring;
        self.begin(SessionKind::Focus);
    }
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new(TimerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the active session to expiry and return the resulting event.
    fn expire(session: &mut TimerSession, now_ms: &mut u64) -> Event {
        // Anchor first in case the countdown was just (re)started.
        session.tick(*now_ms);
        loop {
            *now_ms += 1000;
            if let Some(event) = session.tick(*now_ms) {
                return event;
            }
        }
    }

    #[test]
    fn starts_on_config_screen() {
        let s = TimerSession::default();
        let st = s.state();
        assert_eq!(st.screen_mode, ScreenMode::Configuring);
        assert_eq!(st.kind, SessionKind::Focus);
        assert_eq!(st.current_round, 1);
        assert!(!st.running);
        assert_eq!(st.remaining_seconds, 25 * 60);
    }

    #[test]
    fn single_round_goes_straight_to_ended() {
        let mut s = TimerSession::default();
        let mut now = 0;
        s.press_start();
        match expire(&mut s, &mut now) {
            Event::SessionAdvanced { from, to, .. } => {
                assert_eq!(from, SessionKind::Focus);
                assert_eq!(to, SessionKind::Ended);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.state().remaining_seconds, DEFAULT_ENDED_DISPLAY_SECS);
    }

    #[test]
    fn ended_timeout_resets_cycle() {
        let mut s = TimerSession::default();
        s.increment_rounds();
        let mut now = 0;
        s.press_start();
        expire(&mut s, &mut now); // -> short break
        expire(&mut s, &mut now); // -> focus 2
        expire(&mut s, &mut now); // -> ended
        match expire(&mut s, &mut now) {
            Event::CycleReset { reason, .. } => assert_eq!(reason, ResetReason::Completed),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(*s.config(), SessionConfig::default());
        let st = s.state();
        assert_eq!(st.screen_mode, ScreenMode::Configuring);
        assert_eq!(st.current_round, 1);
        assert_eq!(st.kind, SessionKind::Focus);
        assert!(!st.running);
    }

    #[test]
    fn stall_across_boundary_drops_the_overshoot() {
        let mut s = TimerSession::default();
        s.increment_rounds();
        s.press_start();
        s.tick(0);
        // Whole focus block plus ten extra seconds in one frame.
        let now = (25 * 60 + 10) * 1000;
        match s.tick(now) {
            Some(Event::SessionAdvanced { to, duration_secs, .. }) => {
                assert_eq!(to, SessionKind::ShortBreak);
                assert_eq!(duration_secs, 300);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.state().remaining_seconds, 300);

        // The break is counted from the boundary frame.
        s.tick(now + 999);
        assert_eq!(s.state().remaining_seconds, 300);
        s.tick(now + 1000);
        assert_eq!(s.state().remaining_seconds, 299);
    }

    #[test]
    fn rounds_only_change_while_configuring() {
        let mut s = TimerSession::default();
        assert!(s.increment_rounds().is_some());
        assert_eq!(s.config().rounds_total, 2);
        s.press_start();
        assert!(s.increment_rounds().is_none());
        assert!(s.decrement_rounds().is_none());
        assert_eq!(s.config().rounds_total, 2);
    }

    #[test]
    fn decrement_clamps_at_one() {
        let mut s = TimerSession::default();
        assert!(s.decrement_rounds().is_none());
        assert_eq!(s.config().rounds_total, 1);
    }

    #[test]
    fn start_toggles_pause_when_active() {
        let mut s = TimerSession::default();
        s.press_start();
        assert!(s.state().running);
        assert!(matches!(s.press_start(), Some(Event::TimerPaused { .. })));
        assert!(!s.state().running);
        assert!(matches!(s.press_start(), Some(Event::TimerResumed { .. })));
        assert!(s.state().running);
        assert_eq!(s.state().screen_mode, ScreenMode::Active);
    }

    #[test]
    fn pause_does_not_consume_time() {
        let mut s = TimerSession::default();
        s.press_start();
        s.tick(0);
        s.tick(2_000);
        assert_eq!(s.state().remaining_seconds, 25 * 60 - 2);
        s.press_start(); // pause
        s.tick(500_000);
        s.press_start(); // resume
        s.tick(500_000);
        assert_eq!(s.state().remaining_seconds, 25 * 60 - 2);
        s.tick(501_000);
        assert_eq!(s.state().remaining_seconds, 25 * 60 - 3);
    }

    #[test]
    fn stop_resets_everything() {
        let mut s = TimerSession::default();
        s.increment_rounds();
        s.increment_rounds();
        let mut now = 0;
        s.press_start();
        expire(&mut s, &mut now);
        s.press_stop();
        assert_eq!(*s.config(), SessionConfig::default());
        let st = s.state();
        assert_eq!(st.current_round, 1);
        assert_eq!(st.kind, SessionKind::Focus);
        assert_eq!(st.screen_mode, ScreenMode::Configuring);
        assert!(!st.running);
    }

    #[test]
    fn reset_keeps_rounds() {
        let mut s = TimerSession::default();
        s.increment_rounds();
        s.increment_rounds();
        let mut now = 0;
        s.press_start();
        expire(&mut s, &mut now);
        expire(&mut s, &mut now);
        assert_eq!(s.state().current_round, 2);

        s.press_reset();
        let st = s.state();
        assert_eq!(st.screen_mode, ScreenMode::Configuring);
        assert!(!st.running);
        assert_eq!(st.current_round, 2);
        assert_eq!(s.config().rounds_total, 3);

        // Starting again begins a fresh first round.
        s.press_start();
        assert_eq!(s.state().current_round, 1);
        assert_eq!(s.state().kind, SessionKind::Focus);
    }

    #[test]
    fn configuring_ignores_ticks() {
        let mut s = TimerSession::default();
        assert!(s.tick(0).is_none());
        assert!(s.tick(10_000_000).is_none());
        assert_eq!(s.state().remaining_seconds, 25 * 60);
    }

    #[test]
    fn transition_function_picks_breaks() {
        let eight = SessionConfig::for_rounds(8);
        assert_eq!(
            next_session(SessionKind::Focus, 4, &eight),
            Transition::Next { kind: SessionKind::LongBreak, round: 4 }
        );
        assert_eq!(
            next_session(SessionKind::Focus, 3, &eight),
            Transition::Next { kind: SessionKind::ShortBreak, round: 3 }
        );
        assert_eq!(
            next_session(SessionKind::LongBreak, 4, &eight),
            Transition::Next { kind: SessionKind::Focus, round: 5 }
        );
        assert_eq!(
            next_session(SessionKind::Focus, 8, &eight),
            Transition::Next { kind: SessionKind::Ended, round: 8 }
        );
        assert_eq!(next_session(SessionKind::Ended, 8, &eight), Transition::Finished);
    }

    #[test]
    fn custom_ended_display_time() {
        let mut s = TimerSession::new(TimerOptions {
            tick_mode: TickMode::ResetToNow,
            ended_display_secs: 2,
        });
        let mut now = 0;
        s.press_start();
        expire(&mut s, &mut now);
        assert_eq!(s.state().kind, SessionKind::Ended);
        assert_eq!(s.state().remaining_seconds, 2);
    }
}
