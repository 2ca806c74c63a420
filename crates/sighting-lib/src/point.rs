//! Extracted point records and KML coordinate parsing

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name given to placemarks without a `<name>`
pub const UNNAMED: &str = "Unnamed";

/// A single extracted sighting position
///
/// Field order is the column order of the point CSV output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Name of the direct parent folder, `"Root"` or `"Unknown"`
    pub folder: String,
    /// Placemark name, `"Unnamed"` when absent
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude in meters, 0.0 when the source omits it
    pub altitude: f64,
}

impl GeoPoint {
    /// Build a point from its folder, name and parsed coordinate
    pub fn new(folder: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            altitude: coordinate.altitude,
        }
    }

    /// Position as a `geo` point (x = longitude, y = latitude)
    #[inline]
    pub fn position(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

impl From<&GeoPoint> for geo::Point<f64> {
    fn from(point: &GeoPoint) -> Self {
        point.position()
    }
}

/// Reasons a KML coordinate string cannot produce a point
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("Missing <coordinates> element")]
    Missing,

    #[error("Expected at least longitude and latitude, found {0} component(s)")]
    TooFewComponents(usize),

    #[error("Component {index} is not a finite number: {value:?}")]
    NotNumeric { index: usize, value: String },
}

/// A parsed `longitude,latitude[,altitude]` tuple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoordinateError::TooFewComponents(0));
        }

        let components = text
            .split(',')
            .enumerate()
            .map(|(index, raw)| {
                let value = raw.trim();
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|parsed| parsed.is_finite())
                    .ok_or_else(|| CoordinateError::NotNumeric {
                        index,
                        value: value.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        match components.as_slice() {
            [longitude, latitude] => Ok(Coordinate {
                longitude: *longitude,
                latitude: *latitude,
                altitude: 0.0,
            }),
            [longitude, latitude, altitude, ..] => Ok(Coordinate {
                longitude: *longitude,
                latitude: *latitude,
                altitude: *altitude,
            }),
            _ => Err(CoordinateError::TooFewComponents(components.len())),
        }
    }
}
