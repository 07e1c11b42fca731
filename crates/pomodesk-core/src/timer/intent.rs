use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A discrete user action, fired once per button press / key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Increment,
    Decrement,
    /// Start from the configuration screen, or toggle pause while active.
    Start,
    Stop,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown intent '{0}' (expected one of: +, -, start, stop, reset)")]
pub struct ParseIntentError(pub String);

impl FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "+" | "inc" | "increment" => Ok(Intent::Increment),
            "-" | "dec" | "decrement" => Ok(Intent::Decrement),
            "s" | "start" => Ok(Intent::Start),
            "x" | "stop" => Ok(Intent::Stop),
            "r" | "reset" => Ok(Intent::Reset),
            other => Err(ParseIntentError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("+".parse::<Intent>(), Ok(Intent::Increment));
        assert_eq!(" Dec ".parse::<Intent>(), Ok(Intent::Decrement));
        assert_eq!("s".parse::<Intent>(), Ok(Intent::Start));
        assert_eq!("x".parse::<Intent>(), Ok(Intent::Stop));
        assert_eq!("RESET".parse::<Intent>(), Ok(Intent::Reset));
    }

    #[test]
    fn pause_and_resume_are_not_aliases() {
        assert!("pause".parse::<Intent>().is_err());
        assert!("resume".parse::<Intent>().is_err());
    }

    #[test]
    fn rejects_unknown() {
        let err = "jump".parse::<Intent>().unwrap_err();
        assert_eq!(err, ParseIntentError("jump".into()));
    }
}
