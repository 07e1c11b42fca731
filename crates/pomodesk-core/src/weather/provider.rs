//! Location and forecast lookups.
//!
//! The HTTP provider speaks the ip-api.com and open-meteo.com response
//! shapes; both base URLs come from configuration.

use std::future::Future;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::WeatherError;
use crate::storage::WeatherConfig;

const USER_AGENT: &str = "pomodesk";
const LOCATION_SERVICE: &str = "location lookup";
const FORECAST_SERVICE: &str = "forecast";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
}

impl Location {
    /// `(0, 0)` doubles as "no fix yet".
    pub fn is_known(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            city: "unknown".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub wind_speed_kph: f64,
    pub weather_code: Option<u16>,
}

/// Source of location fixes and current weather.
pub trait WeatherProvider: Send + Sync {
    fn fetch_location(&self) -> impl Future<Output = Result<Location, WeatherError>> + Send;

    fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<WeatherReading, WeatherError>> + Send;
}

#[derive(Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    #[serde(default)]
    weathercode: Option<u16>,
}

/// IP geolocation + open-meteo forecast over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWeatherProvider {
    client: Client,
    location_url: Url,
    forecast_url: Url,
}

impl HttpWeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let parse = |raw: &str| {
            Url::parse(raw).map_err(|source| WeatherError::InvalidUrl {
                url: raw.to_string(),
                source,
            })
        };

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(config.request_timeout());
        }
        let client = builder.build().map_err(|source| WeatherError::Request {
            service: "http client",
            source,
        })?;

        Ok(Self {
            client,
            location_url: parse(&config.location_url)?,
            forecast_url: parse(&config.forecast_url)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: Url,
    ) -> Result<T, WeatherError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| WeatherError::Request { service, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                service,
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|source| WeatherError::Request { service, source })?;
        serde_json::from_str(&body).map_err(|e| WeatherError::Malformed {
            service,
            message: e.to_string(),
        })
    }
}

impl WeatherProvider for HttpWeatherProvider {
    async fn fetch_location(&self) -> Result<Location, WeatherError> {
        let body: IpApiResponse = self
            .get_json(LOCATION_SERVICE, self.location_url.clone())
            .await?;

        if body.status.as_deref() == Some("fail") {
            return Err(WeatherError::Malformed {
                service: LOCATION_SERVICE,
                message: body.message.unwrap_or_else(|| "lookup failed".into()),
            });
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Location {
                latitude,
                longitude,
                city: body.city.unwrap_or_else(|| "unknown".into()),
            }),
            _ => Err(WeatherError::Malformed {
                service: LOCATION_SERVICE,
                message: "missing lat/lon".into(),
            }),
        }
    }

    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReading, WeatherError> {
        let mut url = self.forecast_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("current_weather", "true")
            .append_pair("timezone", "auto");

        let body: ForecastResponse = self.get_json(FORECAST_SERVICE, url).await?;
        let current = body.current_weather.ok_or_else(|| WeatherError::Malformed {
            service: FORECAST_SERVICE,
            message: "missing current_weather".into(),
        })?;

        Ok(WeatherReading {
            temperature_c: current.temperature,
            wind_speed_kph: current.windspeed,
            weather_code: current.weathercode,
        })
    }
}
