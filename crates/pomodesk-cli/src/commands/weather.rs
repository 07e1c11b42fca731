use pomodesk_core::error::Result;
use pomodesk_core::{Config, HttpWeatherProvider, LocationWeatherCache};
use tracing::debug;

/// One-shot lookup. Failures leave the defaults in place; the command still
/// succeeds, the same as the running display would.
pub fn run(json: bool) -> Result<()> {
    let config = Config::load()?;
    let provider = HttpWeatherProvider::new(&config.weather)?;
    let mut cache = LocationWeatherCache::new(config.weather.refresh_interval());

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(cache.refresh(&provider, 0));
    debug!(?outcome, "weather lookup finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&cache)?);
    } else {
        println!("{}", cache.summary());
    }
    Ok(())
}
