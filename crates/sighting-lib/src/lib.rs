//! Sighting Library - KMZ Extraction, Weather Enrichment and Summaries
//!
//! This library turns Google Earth exports (KMZ archives or plain KML documents) into flat
//! records of geotagged sightings, enriches timestamped sightings with historical weather and
//! aggregates temperatures per sighted species.
//!
//! # Architecture
//!
//! - **[`extract`]**: Single-pass KML tree walk producing [`GeoPoint`]s, parameterized by an
//!   [`ExtractMode`] (every point, or only points whose style reference carries a marker)
//! - **[`FolderIndex`]**: Placemark-to-folder membership, keyed by placemark enumeration index
//! - **[`csv_io`]**: Delimited-text readers and writers for points, sightings and enriched rows
//! - **[`OpenWeatherClient`]**: Historical weather lookups behind the [`WeatherSource`] trait
//! - **[`enrich`]**: Sequential enrichment pipeline with an explicit [`FailurePolicy`]
//! - **[`summarize`]**: Mean/min/max temperature per sighting name
//!
//! # Error model
//!
//! Document-level problems (not a ZIP archive, no `.kml` entry, unparsable XML) are fatal and
//! surface as [`ExtractError`]. Record-level problems (a placemark with unusable coordinates)
//! only skip that placemark and emit a `tracing` warning.

pub mod csv_io;
mod enrich;
mod extract;
mod folder_index;
mod kml;
mod point;
mod sighting;
mod summary;
pub mod utils;
mod weather;

#[cfg(test)]
mod test_support;

// Public API exports
pub use enrich::{EnrichError, EnrichReport, FailurePolicy, enrich};
pub use extract::{
    ExtractMode, ExtractReport, SkipCounts, extract, extract_file, extract_files_parallel,
    extract_kml, extract_report,
};
pub use folder_index::{FolderIndex, ROOT_FOLDER, UNKNOWN_FOLDER};
pub use point::{Coordinate, CoordinateError, GeoPoint, UNNAMED};
pub use sighting::{EnrichedSighting, Sighting, TIMESTAMP_FORMAT};
pub use summary::{FolderSummary, TemperatureSummary, summarize, summarize_folders};
pub use weather::{
    DEFAULT_BASE_URL, OpenWeatherClient, WeatherConfig, WeatherError, WeatherQuery, WeatherRecord,
    WeatherSource, parse_timemachine_response,
};

/// Fatal errors of a single extraction call
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Not a valid KMZ container: {0}")]
    InvalidContainer(#[source] zip::result::ZipError),

    #[error("No .kml document found in container")]
    NoDocumentFound,

    #[error("Malformed document {entry}: {reason}")]
    MalformedDocument { entry: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
