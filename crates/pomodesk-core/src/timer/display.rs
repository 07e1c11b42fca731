//! Display projection.
//!
//! Pure functions from timer state to the strings a renderer draws. Nothing
//! here touches the countdown, so hosts may call it every frame.

use serde::{Deserialize, Serialize};

use super::rounds::SessionConfig;
use super::session::{ScreenMode, SessionKind, SessionState};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub session_label: String,
    pub timer_text: String,
    pub screen_mode: ScreenMode,
    /// Only meaningful on the configuration screen.
    pub config_summary: String,
    pub running: bool,
    pub kind: SessionKind,
    pub current_round: u32,
    pub remaining_seconds: u64,
}

/// `MM:SS`, both fields zero padded. Minutes are not wrapped into hours.
pub fn format_countdown(remaining_secs: u64) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

pub fn session_label(kind: SessionKind, round: u32) -> String {
    match kind {
        SessionKind::Focus => format!("Focus Round {round}"),
        SessionKind::ShortBreak => "Short Break".to_string(),
        SessionKind::LongBreak => "Long Break".to_string(),
        SessionKind::Ended => "Session Ended!".to_string(),
    }
}

pub fn config_summary(config: &SessionConfig) -> String {
    format!(
        "Rounds: {}    FocusTime: {}    ShortBreak: {}    LongBreak: {}",
        config.rounds_total,
        config.focus_minutes,
        config.short_break_minutes,
        config.long_break_minutes
    )
}

pub fn project(state: &SessionState, config: &SessionConfig) -> DisplaySnapshot {
    DisplaySnapshot {
        session_label: session_label(state.kind, state.current_round),
        timer_text: format_countdown(state.remaining_seconds),
        screen_mode: state.screen_mode,
        config_summary: config_summary(config),
        running: state.running,
        kind: state.kind,
        current_round: state.current_round,
        remaining_seconds: state.remaining_seconds,
    }
}
