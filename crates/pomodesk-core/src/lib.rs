//! # Pomodesk Core Library
//!
//! Core logic for the Pomodesk focus timer. Hosts (the bundled CLI, or any
//! other front-end) own the event loop; this crate owns the state.
//!
//! ## Architecture
//!
//! - **Countdown**: turns host timestamps into whole-second decrements
//! - **Session machine**: focus / short break / long break / ended, round
//!   counting and the configuration screen, driven by discrete intents
//! - **Display projection**: pure functions from state to on-screen text
//! - **Weather**: fail-soft location/forecast cache refreshed off the host loop
//! - **Storage**: TOML host configuration
//!
//! ## Key Components
//!
//! - [`TimerSession`]: the timer aggregate a host owns and drives
//! - [`DisplaySnapshot`]: what a renderer draws each frame
//! - [`WeatherService`]: background weather refresher
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;
pub mod weather;

pub use error::{ConfigError, CoreError, WeatherError};
pub use events::{Event, ResetReason};
pub use storage::Config;
pub use timer::{
    DisplaySnapshot, Intent, ScreenMode, SessionConfig, SessionKind, SessionPlan, SessionState,
    TickMode, TimerOptions, TimerSession,
};
pub use weather::{HttpWeatherProvider, LocationWeatherCache, WeatherProvider, WeatherService};
