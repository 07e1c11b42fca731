//! Countdown engine.
//!
//! Converts host-supplied timestamps into whole-second decrements of a
//! remaining-seconds counter, independent of how often the host polls. There
//! is no internal thread: the caller feeds `tick()` once per frame.

use serde::{Deserialize, Serialize};

/// Upper bound on seconds consumed by a single drift-free tick.
///
/// A larger gap (host suspended, clock jump) consumes this many seconds and
/// resyncs the reference to `now`.
pub const MAX_CATCH_UP_SECS: u64 = 3600;

const MS_PER_SEC: u64 = 1000;

/// How the tick reference moves after a second is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    /// Advance the reference by exactly the seconds consumed. A stalled frame
    /// is caught up on the next tick.
    #[default]
    DriftFree,
    /// Consume at most one second per tick and reset the reference to `now`.
    /// Stalls longer than a second silently drop the extra time.
    ResetToNow,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    mode: TickMode,
    remaining_secs: u64,
    /// Timestamp (host ms) the last whole second was counted from.
    /// `None` until the next tick anchors it.
    last_tick_ms: Option<u64>,
}

impl Countdown {
    pub fn new(mode: TickMode) -> Self {
        Self {
            mode,
            remaining_secs: 0,
            last_tick_ms: None,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Load a new duration. The reference is re-anchored by the next tick.
    pub fn start(&mut self, duration_secs: u64) {
        self.remaining_secs = duration_secs;
        self.last_tick_ms = None;
    }

    /// Count the next second from `now_ms`.
    pub fn anchor(&mut self, now_ms: u64) {
        self.last_tick_ms = Some(now_ms);
    }

    /// Forget the reference so paused wall time is never counted.
    pub fn suspend(&mut self) {
        self.last_tick_ms = None;
    }

    /// Advance the countdown to `now_ms`. Returns the seconds consumed.
    pub fn tick(&mut self, now_ms: u64, running: bool) -> u64 {
        if !running {
            return 0;
        }
        let Some(last) = self.last_tick_ms else {
            self.last_tick_ms = Some(now_ms);
            return 0;
        };

        // Non-monotonic input counts as no time passing.
        let whole_secs = now_ms.saturating_sub(last) / MS_PER_SEC;
        if whole_secs == 0 {
            return 0;
        }

        let consumed = match self.mode {
            TickMode::ResetToNow => {
                self.last_tick_ms = Some(now_ms);
                1
            }
            TickMode::DriftFree if whole_secs > MAX_CATCH_UP_SECS => {
                self.last_tick_ms = Some(now_ms);
                MAX_CATCH_UP_SECS
            }
            TickMode::DriftFree => {
                self.last_tick_ms = Some(last + whole_secs * MS_PER_SEC);
                whole_secs
            }
        };

        let consumed = consumed.min(self.remaining_secs);
        self.remaining_secs -= consumed;
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(mode: TickMode, secs: u64, at_ms: u64) -> Countdown {
        let mut c = Countdown::new(mode);
        c.start(secs);
        c.anchor(at_ms);
        c
    }

    #[test]
    fn paused_tick_is_noop() {
        let mut c = started(TickMode::DriftFree, 10, 0);
        assert_eq!(c.tick(5_000, false), 0);
        assert_eq!(c.remaining_secs(), 10);
    }

    #[test]
    fn sub_second_ticks_do_nothing() {
        let mut c = started(TickMode::DriftFree, 10, 0);
        assert_eq!(c.tick(400, true), 0);
        assert_eq!(c.tick(999, true), 0);
        assert_eq!(c.remaining_secs(), 10);
        assert_eq!(c.tick(1_000, true), 1);
        assert_eq!(c.remaining_secs(), 9);
    }

    #[test]
    fn same_timestamp_twice_decrements_once() {
        for mode in [TickMode::DriftFree, TickMode::ResetToNow] {
            let mut c = started(mode, 10, 0);
            c.tick(1_500, true);
            c.tick(1_500, true);
            assert_eq!(c.remaining_secs(), 9, "{mode:?}");
        }
    }

    #[test]
    fn drift_free_keeps_fractional_remainder() {
        let mut c = started(TickMode::DriftFree, 10, 0);
        c.tick(1_600, true);
        // Reference sits at 1_000, so 2_000 completes the second second.
        assert_eq!(c.tick(2_000, true), 1);
        assert_eq!(c.remaining_secs(), 8);
    }

    #[test]
    fn reset_to_now_loses_fractional_remainder() {
        let mut c = started(TickMode::ResetToNow, 10, 0);
        c.tick(1_600, true);
        assert_eq!(c.tick(2_000, true), 0);
        assert_eq!(c.tick(2_600, true), 1);
        assert_eq!(c.remaining_secs(), 8);
    }

    #[test]
    fn drift_free_catches_up_a_stall() {
        let mut c = started(TickMode::DriftFree, 10, 0);
        assert_eq!(c.tick(3_200, true), 3);
        assert_eq!(c.remaining_secs(), 7);
    }

    #[test]
    fn reset_to_now_skips_stalled_seconds() {
        let mut c = started(TickMode::ResetToNow, 10, 0);
        assert_eq!(c.tick(3_200, true), 1);
        assert_eq!(c.remaining_secs(), 9);
    }

    #[test]
    fn drift_free_caps_huge_gaps() {
        let mut c = started(TickMode::DriftFree, 10_000, 0);
        let gap_ms = (MAX_CATCH_UP_SECS + 500) * 1_000;
        assert_eq!(c.tick(gap_ms, true), MAX_CATCH_UP_SECS);
        // Reference resynced to `now`; nothing left to catch up.
        assert_eq!(c.tick(gap_ms + 10, true), 0);
    }

    #[test]
    fn backwards_time_is_ignored() {
        let mut c = started(TickMode::DriftFree, 10, 5_000);
        assert_eq!(c.tick(1_000, true), 0);
        assert_eq!(c.remaining_secs(), 10);
    }

    #[test]
    fn floors_at_zero() {
        let mut c = started(TickMode::DriftFree, 2, 0);
        assert_eq!(c.tick(10_000, true), 2);
        assert!(c.is_expired());
        assert_eq!(c.tick(20_000, true), 0);
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn unanchored_tick_anchors_without_consuming() {
        let mut c = Countdown::new(TickMode::DriftFree);
        c.start(5);
        assert_eq!(c.tick(50_000, true), 0);
        assert_eq!(c.tick(51_000, true), 1);
    }

    #[test]
    fn suspend_discards_paused_time() {
        let mut c = started(TickMode::DriftFree, 10, 0);
        c.tick(1_000, true);
        c.suspend();
        assert_eq!(c.tick(60_000, false), 0);
        // Resume: first tick re-anchors.
        assert_eq!(c.tick(60_000, true), 0);
        assert_eq!(c.tick(61_000, true), 1);
        assert_eq!(c.remaining_secs(), 8);
    }
}
