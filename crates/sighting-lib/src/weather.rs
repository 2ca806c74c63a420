//! Historical weather lookups
//!
//! [`OpenWeatherClient`] queries the OpenWeatherMap One Call 3.0 "timemachine" endpoint
//! for the conditions at a place and instant. Consumers depend on the [`WeatherSource`]
//! trait so that the enrichment pipeline can run against any source.

use crate::utils::kelvin_to_celsius;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Default OpenWeatherMap API host
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Path of the historical (timemachine) endpoint
const TIMEMACHINE_PATH: &str = "/data/3.0/onecall/timemachine";

/// Errors of a single weather lookup
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Weather API returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Unexpected weather response shape: {0}")]
    ResponseShape(String),

    #[error("No weather API key configured")]
    MissingApiKey,
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the API key
        Self::Request(err.without_url())
    }
}

/// Connection settings for [`OpenWeatherClient`]
#[derive(Clone)]
pub struct WeatherConfig {
    /// API host, without the endpoint path
    pub base_url: String,
    /// OpenWeatherMap application id
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A place and instant to look up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub time: DateTime<Utc>,
}

/// Weather at a place and time, temperatures converted to Celsius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Instant the sample refers to
    pub time: DateTime<Utc>,
    /// Latitude echoed by the API
    pub latitude: f64,
    /// Longitude echoed by the API
    pub longitude: f64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub pressure_hpa: f64,
    pub humidity_pct: f64,
    pub clouds_pct: f64,
    /// Wind speed in meters per second
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_deg: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Condition group, e.g. "Rain"
    pub condition: String,
    /// Condition detail, e.g. "light rain"
    pub description: String,
}

/// Anything able to answer weather lookups
pub trait WeatherSource {
    /// Weather at the query's place and time
    fn fetch(&self, query: &WeatherQuery)
    -> impl Future<Output = Result<WeatherRecord, WeatherError>>;
}

/// OpenWeatherMap One Call 3.0 client
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    /// Create a client, failing if no API key is configured
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        if config.api_key.trim().is_empty() {
            return Err(WeatherError::MissingApiKey);
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            TIMEMACHINE_PATH
        )
    }
}

impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherRecord, WeatherError> {
        tracing::debug!(
            "Requesting weather at ({}, {}) for {}",
            query.latitude,
            query.longitude,
            query.time
        );

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("lat", query.latitude.to_string()),
                ("lon", query.longitude.to_string()),
                ("dt", query.time.timestamp().to_string()),
                ("appid", self.config.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(WeatherError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        parse_timemachine_response(&body)
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TimemachineResponse {
    lat: f64,
    lon: f64,
    data: Vec<TimemachineSample>,
}

#[derive(Deserialize)]
struct TimemachineSample {
    dt: i64,
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
    clouds: f64,
    wind_speed: f64,
    wind_deg: f64,
    sunrise: i64,
    sunset: i64,
    weather: Vec<TimemachineCondition>,
}

#[derive(Deserialize)]
struct TimemachineCondition {
    main: String,
    description: String,
}

/// Decode a timemachine response body into a [`WeatherRecord`]
///
/// Only the first sample and its first condition are used. Kelvin temperatures are
/// converted to Celsius.
pub fn parse_timemachine_response(body: &str) -> Result<WeatherRecord, WeatherError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("weather::parse_timemachine_response");

    let response: TimemachineResponse =
        serde_json::from_str(body).map_err(|err| WeatherError::ResponseShape(err.to_string()))?;

    let sample = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::ResponseShape("empty data array".to_string()))?;
    let condition = sample
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::ResponseShape("empty weather array".to_string()))?;

    Ok(WeatherRecord {
        time: unix_time(sample.dt, "dt")?,
        latitude: response.lat,
        longitude: response.lon,
        temperature_c: kelvin_to_celsius(sample.temp),
        feels_like_c: kelvin_to_celsius(sample.feels_like),
        pressure_hpa: sample.pressure,
        humidity_pct: sample.humidity,
        clouds_pct: sample.clouds,
        wind_speed: sample.wind_speed,
        wind_deg: sample.wind_deg,
        sunrise: unix_time(sample.sunrise, "sunrise")?,
        sunset: unix_time(sample.sunset, "sunset")?,
        condition: condition.main,
        description: condition.description,
    })
}

fn unix_time(seconds: i64, field: &str) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| WeatherError::ResponseShape(format!("{field} out of range: {seconds}")))
}
