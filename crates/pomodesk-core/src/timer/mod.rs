mod countdown;
pub mod display;
mod intent;
mod plan;
mod rounds;
mod session;

pub use countdown::{Countdown, TickMode, MAX_CATCH_UP_SECS};
pub use display::DisplaySnapshot;
pub use intent::{Intent, ParseIntentError};
pub use plan::{PlannedSession, SessionPlan, MAX_PLAN_ROUNDS};
pub use rounds::{
    SessionConfig, FOCUS_MINUTES_PER_ROUND, LONG_BREAK_MINUTES, ROUNDS_PER_LONG_BREAK,
    SHORT_BREAK_MINUTES,
};
pub use session::{
    next_session, ScreenMode, SessionKind, SessionState, TimerOptions, TimerSession, Transition,
    DEFAULT_ENDED_DISPLAY_SECS,
};
