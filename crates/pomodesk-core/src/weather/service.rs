//! Background weather refresher.
//!
//! The lookups run on a tokio task and publish each refreshed cache through
//! a `watch` channel. Readers only ever see the last completed result, so a
//! slow network never stalls the timer loop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::cache::LocationWeatherCache;
use super::provider::WeatherProvider;

/// Longest gap between due-checks, whatever the refresh interval.
const MAX_POLL: Duration = Duration::from_secs(1);

pub struct WeatherService {
    rx: watch::Receiver<LocationWeatherCache>,
    task: JoinHandle<()>,
}

impl WeatherService {
    /// Spawn the refresher on the current tokio runtime.
    ///
    /// The first lookup starts immediately.
    pub fn spawn<P>(provider: P, refresh_interval: Duration) -> Self
    where
        P: WeatherProvider + 'static,
    {
        let cache = LocationWeatherCache::new(refresh_interval);
        let (tx, rx) = watch::channel(cache.clone());
        let task = tokio::spawn(refresh_loop(provider, cache, tx));
        Self { rx, task }
    }

    /// Last completed result. Never waits on the network.
    pub fn latest(&self) -> LocationWeatherCache {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LocationWeatherCache> {
        self.rx.clone()
    }
}

impl Drop for WeatherService {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn refresh_loop<P: WeatherProvider>(
    provider: P,
    mut cache: LocationWeatherCache,
    tx: watch::Sender<LocationWeatherCache>,
) {
    let started = Instant::now();
    let period = cache
        .refresh_interval()
        .clamp(Duration::from_millis(1), MAX_POLL);
    let mut poll = tokio::time::interval(period);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        poll.tick().await;
        let now_ms = started.elapsed().as_millis() as u64;
        if cache.refresh_if_due(&provider, now_ms).await.is_none() {
            continue;
        }
        if tx.send(cache.clone()).is_err() {
            debug!("weather receivers gone; stopping refresher");
            break;
        }
    }
}
