//! Timestamped sightings and their weather-enriched form

use crate::weather::{WeatherQuery, WeatherRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used by sighting CSV files, interpreted as UTC
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single observation to be enriched with weather
///
/// Input files with the Portuguese headers `nome_ave` and `data_hora` are read as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    /// What was sighted (species or individual name)
    #[serde(alias = "nome_ave")]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "timestamp_format", alias = "data_hora")]
    pub timestamp: DateTime<Utc>,
}

impl Sighting {
    /// Weather lookup for the place and time of this sighting
    pub fn query(&self) -> WeatherQuery {
        WeatherQuery {
            latitude: self.latitude,
            longitude: self.longitude,
            time: self.timestamp,
        }
    }
}

/// A sighting joined with the weather observed at its place and time
///
/// Flat so that it maps onto one CSV row. Temperatures are in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSighting {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub weather_time: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub pressure_hpa: f64,
    pub humidity_pct: f64,
    pub clouds_pct: f64,
    pub wind_speed: f64,
    pub wind_deg: f64,
    pub condition: String,
    pub description: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl EnrichedSighting {
    /// Join a sighting with its weather record
    pub fn new(sighting: &Sighting, weather: WeatherRecord) -> Self {
        Self {
            name: sighting.name.clone(),
            latitude: sighting.latitude,
            longitude: sighting.longitude,
            timestamp: sighting.timestamp,
            weather_time: weather.time,
            temperature_c: weather.temperature_c,
            feels_like_c: weather.feels_like_c,
            pressure_hpa: weather.pressure_hpa,
            humidity_pct: weather.humidity_pct,
            clouds_pct: weather.clouds_pct,
            wind_speed: weather.wind_speed,
            wind_deg: weather.wind_deg,
            condition: weather.condition,
            description: weather.description,
            sunrise: weather.sunrise,
            sunset: weather.sunset,
        }
    }

    /// Position of the sighting (x = longitude, y = latitude)
    #[inline]
    pub fn position(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

/// Serde adapter for [`TIMESTAMP_FORMAT`]
mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
