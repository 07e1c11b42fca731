//! Interactive host loop.
//!
//! Owns the one `TimerSession`, polls the clock, applies intents typed on
//! stdin and prints the snapshot whenever it changes. Weather runs on its own
//! task; the loop only reads its last published value.

use std::io::BufRead;
use std::time::Duration;

use clap::Args;
use pomodesk_core::timer::DisplaySnapshot;
use pomodesk_core::weather::LocationWeatherCache;
use pomodesk_core::{
    Config, HttpWeatherProvider, Intent, ScreenMode, TimerSession, WeatherService,
};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Args)]
pub struct RunArgs {
    /// Skip the background weather lookup
    #[arg(long)]
    no_weather: bool,
    /// Print snapshots as JSON lines
    #[arg(long)]
    json: bool,
    /// Clock poll interval in milliseconds (overrides config)
    #[arg(long)]
    poll_ms: Option<u64>,
}

enum Input {
    Intent(Intent),
    Quit,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(host_loop(args, config))
}

async fn host_loop(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let poll = args
        .poll_ms
        .map(|ms| Duration::from_millis(ms.max(1)))
        .unwrap_or_else(|| config.timer.poll_interval());

    let mut session = TimerSession::new(config.timer.options());

    let weather = if config.weather.enabled && !args.no_weather {
        match HttpWeatherProvider::new(&config.weather) {
            Ok(provider) => Some(WeatherService::spawn(
                provider,
                config.weather.refresh_interval(),
            )),
            Err(e) => {
                warn!(error = %e, "weather disabled for this run");
                None
            }
        }
    } else {
        None
    };
    let mut weather_rx = weather.as_ref().map(WeatherService::subscribe);

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx);

    let started = Instant::now();
    let mut ticker = tokio::time::interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut screen = Screen::new(args.json);
    screen.draw(&session.snapshot())?;

    loop {
        tokio::select! {
            input = rx.recv() => match input {
                Some(Input::Intent(intent)) => {
                    if let Some(event) = session.apply(intent) {
                        debug!(?event, "intent applied");
                    }
                }
                Some(Input::Quit) | None => break,
            },
            _ = ticker.tick() => {
                let now_ms = started.elapsed().as_millis() as u64;
                if let Some(event) = session.tick(now_ms) {
                    info!(?event, "session boundary");
                }
            }
            cache = next_weather(&mut weather_rx) => screen.weather(&cache),
        }
        screen.draw(&session.snapshot())?;
    }

    Ok(())
}

/// Blocking stdin reads live on their own thread; closing stdin closes the channel.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<Input>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "q" | "quit" | "exit") {
                let _ = tx.send(Input::Quit);
                break;
            }
            match line.parse::<Intent>() {
                Ok(intent) => {
                    if tx.send(Input::Intent(intent)).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
        }
    });
}

async fn next_weather(
    rx: &mut Option<watch::Receiver<LocationWeatherCache>>,
) -> LocationWeatherCache {
    if let Some(rx) = rx {
        if rx.changed().await.is_ok() {
            return rx.borrow_and_update().clone();
        }
    }
    std::future::pending().await
}

/// Text renderer that only prints when the line changes.
struct Screen {
    json: bool,
    last: Option<String>,
}

impl Screen {
    fn new(json: bool) -> Self {
        Self { json, last: None }
    }

    fn draw(&mut self, snap: &DisplaySnapshot) -> Result<(), serde_json::Error> {
        let line = if self.json {
            serde_json::to_string(snap)?
        } else {
            render_line(snap)
        };
        if self.last.as_deref() != Some(line.as_str()) {
            println!("{line}");
            self.last = Some(line);
        }
        Ok(())
    }

    fn weather(&mut self, cache: &LocationWeatherCache) {
        let clock = chrono::Local::now().format("%H:%M:%S");
        if self.json {
            match serde_json::to_string(cache) {
                Ok(json) => println!("{json}"),
                Err(e) => debug!(error = %e, "weather serialization failed"),
            }
        } else {
            println!("[weather] {clock}  {}", cache.summary());
        }
    }
}

fn render_line(snap: &DisplaySnapshot) -> String {
    match snap.screen_mode {
        ScreenMode::Configuring => format!("[setup] {}", snap.config_summary),
        ScreenMode::Active => format!(
            "[{}] {}  {}",
            if snap.running { "running" } else { "paused" },
            snap.session_label,
            snap.timer_text
        ),
    }
}
