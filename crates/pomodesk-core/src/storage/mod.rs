mod config;

pub use config::{Config, TimerConfig, WeatherConfig};

use std::path::PathBuf;

/// Returns `~/.config/pomodesk[-dev]/` based on POMODESK_ENV.
///
/// Set POMODESK_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMODESK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodesk-dev")
    } else {
        base_dir.join("pomodesk")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
