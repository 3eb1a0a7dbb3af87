use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DayboardConfig;
use crate::storage::Storage;
use crate::widget::Fetched;

const WEATHER_DATA_KEY: &str = "weatherData";

/// Cached readings younger than this skip the network entirely.
const FRESHNESS: chrono::Duration = chrono::Duration::hours(1);
/// Bound on the location lookup, matching the upstream geolocation timeout.
const LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions as reported by a provider, before caching.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub temperature: i32,
    pub condition: String,
    pub humidity: u8,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature: i32,
    pub condition: String,
    pub humidity: u8,
    pub location: String,
    pub last_updated: DateTime<Utc>,
}

impl Weather {
    fn from_conditions(conditions: Conditions, now: DateTime<Utc>) -> Self {
        Self {
            temperature: conditions.temperature,
            condition: conditions.condition,
            humidity: conditions.humidity,
            location: conditions.location,
            last_updated: now,
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.last_updated < FRESHNESS
    }

    pub fn icon(&self) -> &'static str {
        icon_for(&self.condition)
    }
}

/// Display glyph for a condition label; unknown labels get a partly-cloudy
/// default.
pub fn icon_for(condition: &str) -> &'static str {
    match condition.to_ascii_lowercase().as_str() {
        "clear" => "☀️",
        "clouds" => "☁️",
        "rain" => "🌧️",
        "snow" => "❄️",
        "thunderstorm" => "⛈️",
        _ => "🌤️",
    }
}

/// The fixed terminal reading served when nothing else is available.
fn fallback_reading(now: DateTime<Utc>) -> Weather {
    Weather {
        temperature: 22,
        condition: "Clear".to_string(),
        humidity: 65,
        location: "Your Location".to_string(),
        last_updated: now,
    }
}

/// Where the widget learns its coordinates. The platform geolocation
/// capability of the upstream app maps to either fixed configured
/// coordinates or an IP-based lookup.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn locate(&self, client: &reqwest::Client) -> Result<Coordinates, String>;
}

pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn locate(&self, _client: &reqwest::Client) -> Result<Coordinates, String> {
        Ok(self.0)
    }
}

/// Coarse IP geolocation via ip-api.com.
pub struct IpLookup;

#[async_trait]
impl LocationSource for IpLookup {
    async fn locate(&self, client: &reqwest::Client) -> Result<Coordinates, String> {
        let resp = client
            .get("http://ip-api.com/json")
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;
        match (body["lat"].as_f64(), body["lon"].as_f64()) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err("Response missing coordinates".to_string()),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(
        &self,
        client: &reqwest::Client,
        coordinates: Coordinates,
    ) -> Result<Conditions, String>;
}

/// OpenWeatherMap current-weather endpoint. Temperature is requested in
/// metric units and rounded to whole degrees on receipt.
pub struct OpenWeather {
    api_key: String,
}

impl OpenWeather {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeather {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    async fn fetch(
        &self,
        client: &reqwest::Client,
        coordinates: Coordinates,
    ) -> Result<Conditions, String> {
        if self.api_key.is_empty() {
            return Err("No weather API key configured".to_string());
        }
        let resp = client
            .get("https://api.openweathermap.org/data/2.5/weather")
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        let temperature = body["main"]["temp"]
            .as_f64()
            .ok_or_else(|| "Response missing temperature".to_string())?;
        let condition = body["weather"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|w| w["main"].as_str())
            .ok_or_else(|| "Response missing condition".to_string())?;
        let humidity = body["main"]["humidity"].as_u64().unwrap_or(0).min(100) as u8;
        let location = body["name"].as_str().unwrap_or("Unknown").to_string();

        Ok(Conditions {
            temperature: temperature.round() as i32,
            condition: condition.to_string(),
            humidity,
            location,
        })
    }
}

/// Weather widget: fresh cache, then live provider, then stale cache, then
/// the fixed fallback reading. Never fails.
pub struct WeatherWidget {
    storage: Storage,
    client: reqwest::Client,
    location: Box<dyn LocationSource>,
    provider: Box<dyn WeatherProvider>,
}

impl WeatherWidget {
    pub fn new(storage: Storage, config: &DayboardConfig) -> Self {
        let location: Box<dyn LocationSource> = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Box::new(FixedLocation(Coordinates {
                latitude,
                longitude,
            })),
            _ => Box::new(IpLookup),
        };
        let provider = OpenWeather::new(config.weather_api_key.clone().unwrap_or_default());
        Self::with_sources(storage, location, Box::new(provider))
    }

    pub fn with_sources(
        storage: Storage,
        location: Box<dyn LocationSource>,
        provider: Box<dyn WeatherProvider>,
    ) -> Self {
        Self {
            storage,
            client: reqwest::Client::new(),
            location,
            provider,
        }
    }

    /// The current reading: a cached reading younger than an hour is served
    /// without any network call, otherwise a refresh.
    pub async fn current(&self, now: DateTime<Utc>) -> Fetched<Weather> {
        if let Some(cached) = self.storage.get::<Weather>(WEATHER_DATA_KEY) {
            if cached.is_fresh(now) {
                return Fetched::from_cache(cached);
            }
        }
        self.refresh(now).await
    }

    /// Locate, fetch, and cache a new reading. Any failure serves the last
    /// cached reading regardless of age, or the fixed fallback reading.
    pub async fn refresh(&self, now: DateTime<Utc>) -> Fetched<Weather> {
        match self.try_fetch(now).await {
            Ok(weather) => {
                self.storage.set(WEATHER_DATA_KEY, &weather);
                Fetched::from_provider(weather, self.provider.name())
            }
            Err(e) => {
                log::info!("Weather fetch failed: {}", e);
                if let Some(cached) = self.storage.get::<Weather>(WEATHER_DATA_KEY) {
                    return Fetched::from_cache(cached);
                }
                let fallback = fallback_reading(now);
                self.storage.set(WEATHER_DATA_KEY, &fallback);
                Fetched::from_fallback(fallback)
            }
        }
    }

    async fn try_fetch(&self, now: DateTime<Utc>) -> Result<Weather, String> {
        let coordinates =
            match tokio::time::timeout(LOCATION_TIMEOUT, self.location.locate(&self.client)).await
            {
                Ok(result) => result?,
                Err(_) => return Err("Location lookup timed out".to_string()),
            };
        let conditions = self.provider.fetch(&self.client, coordinates).await?;
        Ok(Weather::from_conditions(conditions, now))
    }
}
