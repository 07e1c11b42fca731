//! Location/weather collaborator.
//!
//! Not part of the timer: it shares the host loop but must never block it.
//! [`WeatherService`] refreshes a [`LocationWeatherCache`] in the background;
//! the host reads the last completed result each frame.

mod cache;
mod codes;
mod provider;
mod service;

pub use cache::{LocationWeatherCache, RefreshOutcome};
pub use codes::weather_status;
pub use provider::{HttpWeatherProvider, Location, WeatherProvider, WeatherReading};
pub use service::WeatherService;
