//! Fail-soft location/weather cache.
//!
//! Lookups that fail leave the previous values in place; the first failure
//! leaves the defaults (`0.0`, `"unknown"`, no reading). Nothing here returns
//! an error to the caller.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::codes::weather_status;
use super::provider::{Location, WeatherProvider, WeatherReading};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWeatherCache {
    pub location: Location,
    pub reading: Option<WeatherReading>,
    /// Host ms of the last refresh attempt, successful or not.
    pub last_fetched_at_ms: Option<u64>,
    /// Wall-clock time of the last successful forecast.
    pub fetched_at: Option<DateTime<Utc>>,
    pub refresh_interval_ms: u64,
}

/// What a refresh managed to update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub location_updated: bool,
    pub weather_updated: bool,
}

impl LocationWeatherCache {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            location: Location::default(),
            reading: None,
            last_fetched_at_ms: None,
            fetched_at: None,
            refresh_interval_ms: refresh_interval.as_millis() as u64,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_fetched_at_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.refresh_interval_ms,
        }
    }

    /// Look up location then weather, keeping the last good value of each.
    ///
    /// The attempt time is recorded even when both lookups fail, so a dead
    /// network is retried once per interval rather than every frame.
    pub async fn refresh<P: WeatherProvider>(&mut self, provider: &P, now_ms: u64) -> RefreshOutcome {
        self.last_fetched_at_ms = Some(now_ms);
        let mut outcome = RefreshOutcome::default();

        match provider.fetch_location().await {
            Ok(location) => {
                debug!(city = %location.city, "location updated");
                self.location = location;
                outcome.location_updated = true;
            }
            Err(e) => warn!(error = %e, "location lookup failed; keeping last location"),
        }

        if !self.location.is_known() {
            debug!("no location fix; skipping forecast");
            return outcome;
        }

        match provider
            .fetch_weather(self.location.latitude, self.location.longitude)
            .await
        {
            Ok(reading) => {
                self.reading = Some(reading);
                self.fetched_at = Some(Utc::now());
                outcome.weather_updated = true;
            }
            Err(e) => warn!(error = %e, "forecast failed; keeping last reading"),
        }
        outcome
    }

    pub async fn refresh_if_due<P: WeatherProvider>(
        &mut self,
        provider: &P,
        now_ms: u64,
    ) -> Option<RefreshOutcome> {
        if !self.is_due(now_ms) {
            return None;
        }
        Some(self.refresh(provider, now_ms).await)
    }

    pub fn city_name(&self) -> &str {
        &self.location.city
    }

    pub fn temperature_c(&self) -> f64 {
        self.reading.map(|r| r.temperature_c).unwrap_or(0.0)
    }

    pub fn wind_speed_kph(&self) -> f64 {
        self.reading.map(|r| r.wind_speed_kph).unwrap_or(0.0)
    }

    /// One-line description for text hosts.
    pub fn summary(&self) -> String {
        match self.reading {
            Some(r) => {
                let mut line = format!(
                    "{}  Temperature: {:.1} C  Wind Speed: {:.1} km/hr",
                    self.location.city, r.temperature_c, r.wind_speed_kph
                );
                if let Some(code) = r.weather_code {
                    line.push_str("  ");
                    line.push_str(weather_status(code));
                }
                line
            }
            None => format!("{}  weather unavailable", self.location.city),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::error::WeatherError;

    /// Provider whose lookups can be switched off mid-test.
    struct FlakyProvider {
        location_up: AtomicBool,
        weather_up: AtomicBool,
        temperature_c: f64,
    }

    impl FlakyProvider {
        fn new(temperature_c: f64) -> Self {
            Self {
                location_up: AtomicBool::new(true),
                weather_up: AtomicBool::new(true),
                temperature_c,
            }
        }
    }

    impl WeatherProvider for FlakyProvider {
        async fn fetch_location(&self) -> Result<Location, WeatherError> {
            if !self.location_up.load(Ordering::SeqCst) {
                return Err(WeatherError::Status {
                    service: "test",
                    status: 503,
                });
            }
            Ok(Location {
                latitude: 31.55,
                longitude: 74.34,
                city: "Lahore".into(),
            })
        }

        async fn fetch_weather(&self, _: f64, _: f64) -> Result<WeatherReading, WeatherError> {
            if !self.weather_up.load(Ordering::SeqCst) {
                return Err(WeatherError::Malformed {
                    service: "test",
                    message: "boom".into(),
                });
            }
            Ok(WeatherReading {
                temperature_c: self.temperature_c,
                wind_speed_kph: 7.5,
                weather_code: Some(2),
            })
        }
    }

    #[test]
    fn due_on_first_use_and_after_interval() {
        let mut cache = LocationWeatherCache::new(Duration::from_secs(60));
        assert!(cache.is_due(0));
        cache.last_fetched_at_ms = Some(1_000);
        assert!(!cache.is_due(30_000));
        assert!(!cache.is_due(60_999));
        assert!(cache.is_due(61_000));
        // Clock going backwards never forces a refetch.
        assert!(!cache.is_due(0));
    }

    #[tokio::test]
    async fn refresh_populates_cache() {
        let provider = FlakyProvider::new(21.4);
        let mut cache = LocationWeatherCache::new(Duration::from_secs(60));
        let outcome = cache.refresh(&provider, 0).await;
        assert!(outcome.location_updated && outcome.weather_updated);
        assert_eq!(cache.city_name(), "Lahore");
        assert_eq!(cache.temperature_c(), 21.4);
        assert_eq!(cache.wind_speed_kph(), 7.5);
        assert!(cache.fetched_at.is_some());
        assert_eq!(
            cache.summary(),
            "Lahore  Temperature: 21.4 C  Wind Speed: 7.5 km/hr  Partly cloudy"
        );
    }

    #[tokio::test]
    async fn failures_keep_last_good_values() {
        let provider = FlakyProvider::new(18.0);
        let mut cache = LocationWeatherCache::new(Duration::from_secs(60));
        cache.refresh(&provider, 0).await;

        provider.location_up.store(false, Ordering::SeqCst);
        provider.weather_up.store(false, Ordering::SeqCst);
        let outcome = cache.refresh(&provider, 60_000).await;

        assert_eq!(outcome, RefreshOutcome::default());
        assert_eq!(cache.city_name(), "Lahore");
        assert_eq!(cache.temperature_c(), 18.0);
        assert_eq!(cache.last_fetched_at_ms, Some(60_000));
    }

    #[tokio::test]
    async fn first_failure_leaves_defaults_and_skips_forecast() {
        let provider = FlakyProvider::new(18.0);
        provider.location_up.store(false, Ordering::SeqCst);
        let mut cache = LocationWeatherCache::new(Duration::from_secs(60));
        let outcome = cache.refresh(&provider, 0).await;
        assert!(!outcome.weather_updated);
        assert_eq!(cache.city_name(), "unknown");
        assert_eq!(cache.temperature_c(), 0.0);
        assert_eq!(cache.summary(), "unknown  weather unavailable");
    }

    #[tokio::test]
    async fn refresh_if_due_respects_interval() {
        let provider = FlakyProvider::new(10.0);
        let mut cache = LocationWeatherCache::new(Duration::from_secs(60));
        assert!(cache.refresh_if_due(&provider, 0).await.is_some());
        assert!(cache.refresh_if_due(&provider, 59_999).await.is_none());
        assert!(cache.refresh_if_due(&provider, 60_000).await.is_some());
    }
}
