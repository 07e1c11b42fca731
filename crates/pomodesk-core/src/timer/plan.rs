use serde::{Deserialize, Serialize};

use super::rounds::SessionConfig;
use super::session::{next_session, SessionKind, Transition};

/// Largest round count a host should expand into a full plan.
///
/// A plan holds about two entries per round.
pub const MAX_PLAN_ROUNDS: u32 = 1000;

/// One entry in the sequence a configuration will run through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSession {
    pub kind: SessionKind,
    pub round: u32,
    pub duration_secs: u64,
}

/// The full session sequence for a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub config: SessionConfig,
    pub sessions: Vec<PlannedSession>,
}

impl SessionPlan {
    /// Walk the transition function from Focus round 1 to `Ended`.
    ///
    /// The `Ended` hold is included with `ended_display_secs`.
    pub fn build(config: SessionConfig, ended_display_secs: u64) -> Self {
        let duration = |kind| config.session_secs(kind).unwrap_or(ended_display_secs);

        let mut sessions = vec![PlannedSession {
            kind: SessionKind::Focus,
            round: 1,
            duration_secs: duration(SessionKind::Focus),
        }];
        let (mut kind, mut round) = (SessionKind::Focus, 1);
        while let Transition::Next { kind: next, round: next_round } =
            next_session(kind, round, &config)
        {
            sessions.push(PlannedSession {
                kind: next,
                round: next_round,
                duration_secs: duration(next),
            });
            kind = next;
            round = next_round;
        }
        Self { config, sessions }
    }

    pub fn focus_count(&self) -> usize {
        self.count(SessionKind::Focus)
    }

    pub fn count(&self, kind: SessionKind) -> usize {
        self.sessions.iter().filter(|s| s.kind == kind).count()
    }

    /// Seconds from the first focus block to the end of the last one.
    pub fn working_secs(&self) -> u64 {
        self.sessions
            .iter()
            .filter(|s| s.kind != SessionKind::Ended)
            .map(|s| s.duration_secs)
            .sum()
    }
}
