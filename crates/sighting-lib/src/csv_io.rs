//! Delimited-text readers and writers
//!
//! Every writer emits a header row, even for an empty record set. Readers match columns
//! by header name, so column order in input files does not matter.

use crate::point::GeoPoint;
use crate::sighting::{EnrichedSighting, Sighting};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Column header of extracted point files
pub const POINT_HEADER: [&str; 5] = ["folder", "name", "latitude", "longitude", "altitude"];

/// Column header of enriched sighting files
pub const ENRICHED_HEADER: [&str; 16] = [
    "name",
    "latitude",
    "longitude",
    "timestamp",
    "weather_time",
    "temperature_c",
    "feels_like_c",
    "pressure_hpa",
    "humidity_pct",
    "clouds_pct",
    "wind_speed",
    "wind_deg",
    "condition",
    "description",
    "sunrise",
    "sunset",
];

/// Errors while reading or writing CSV
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CsvError>;

/// Write extracted points with a `folder,name,latitude,longitude,altitude` header
pub fn write_points<W: Write>(writer: W, points: &[GeoPoint]) -> Result<()> {
    write_rows(writer, &POINT_HEADER, points)
}

/// Read extracted points written by [`write_points`]
pub fn read_points<R: Read>(reader: R) -> Result<Vec<GeoPoint>> {
    read_rows(reader)
}

/// Read sightings with `name,latitude,longitude,timestamp` columns
///
/// Timestamps use [`crate::TIMESTAMP_FORMAT`] and are taken as UTC. Other columns are
/// ignored.
pub fn read_sightings<R: Read>(reader: R) -> Result<Vec<Sighting>> {
    read_rows(reader)
}

/// Write enriched sightings, one flat row each
pub fn write_enriched<W: Write>(writer: W, records: &[EnrichedSighting]) -> Result<()> {
    write_rows(writer, &ENRICHED_HEADER, records)
}

/// Read enriched sightings written by [`write_enriched`]
pub fn read_enriched<R: Read>(reader: R) -> Result<Vec<EnrichedSighting>> {
    read_rows(reader)
}

pub fn write_points_file<P: AsRef<Path>>(path: P, points: &[GeoPoint]) -> Result<()> {
    write_points(BufWriter::new(File::create(path)?), points)
}

pub fn read_points_file<P: AsRef<Path>>(path: P) -> Result<Vec<GeoPoint>> {
    read_points(BufReader::new(File::open(path)?))
}

pub fn read_sightings_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sighting>> {
    read_sightings(BufReader::new(File::open(path)?))
}

pub fn write_enriched_file<P: AsRef<Path>>(path: P, records: &[EnrichedSighting]) -> Result<()> {
    write_enriched(BufWriter::new(File::create(path)?), records)
}

pub fn read_enriched_file<P: AsRef<Path>>(path: P) -> Result<Vec<EnrichedSighting>> {
    read_enriched(BufReader::new(File::open(path)?))
}

fn write_rows<W: Write, T: Serialize>(writer: W, header: &[&str], rows: &[T]) -> Result<()> {
    // Header written by hand so that empty outputs still carry it
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(header)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let rows = csv_reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherRecord;
    use chrono::{TimeZone, Utc};

    fn create_test_points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new("Aves", "Jacutinga", "-47.0612,-22.9056,612.5".parse().unwrap()),
            GeoPoint::new("Root", "Ninho, margem", "-46.1,-23.25".parse().unwrap()),
            GeoPoint::new("Unknown", "Unnamed", "0.1,0.2,-3.75".parse().unwrap()),
        ]
    }

    fn to_string(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_points_roundtrip() {
        let points = create_test_points();
        let mut buffer = Vec::new();
        write_points(&mut buffer, &points).unwrap();

        let read_back = read_points(buffer.as_slice()).unwrap();
        assert_eq!(read_back.len(), points.len());
        for (expected, actual) in points.iter().zip(&read_back) {
            assert_eq!(expected.folder, actual.folder);
            assert_eq!(expected.name, actual.name);
            assert!((expected.latitude - actual.latitude).abs() < 1e-9);
            assert!((expected.longitude - actual.longitude).abs() < 1e-9);
            assert!((expected.altitude - actual.altitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_points_header_and_column_order() {
        let mut buffer = Vec::new();
        write_points(&mut buffer, &create_test_points()[..1]).unwrap();

        let text = to_string(buffer);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("folder,name,latitude,longitude,altitude"));
        assert_eq!(lines.next(), Some("Aves,Jacutinga,-22.9056,-47.0612,612.5"));
    }

    #[test]
    fn test_empty_output_keeps_header() {
        let mut buffer = Vec::new();
        write_points(&mut buffer, &[]).unwrap();
        assert_eq!(to_string(buffer), "folder,name,latitude,longitude,altitude\n");
    }

    #[test]
    fn test_read_points_with_reordered_columns() {
        let text = "name,altitude,longitude,latitude,folder\nnest, 5 ,1.5,2.5,Aves\n";
        let points = read_points(text.as_bytes()).unwrap();
        assert_eq!(points[0].folder, "Aves");
        assert_eq!(points[0].altitude, 5.0);
        assert_eq!(points[0].longitude, 1.5);
    }

    #[test]
    fn test_read_sightings() {
        let text = "name,latitude,longitude,timestamp,observer\n\
                    Jacutinga,-22.9,-47.06,2024-03-01 09:15:00,Ana\n\
                    Araponga,-23.1,-46.5,2024-03-02 17:40:30,Rui\n";

        let sightings = read_sightings(text.as_bytes()).unwrap();
        assert_eq!(sightings.len(), 2);
        assert_eq!(sightings[0].name, "Jacutinga");
        assert_eq!(
            sightings[0].timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap()
        );
        assert_eq!(
            sightings[1].timestamp,
            Utc.with_ymd_and_hms(2024, 3, 2, 17, 40, 30).unwrap()
        );
    }

    #[test]
    fn test_read_sightings_with_portuguese_header() {
        let text = "nome_ave,latitude,longitude,data_hora\n\
                    Jacutinga,-22.9,-47.06,2024-03-01 09:15:00\n";

        let sightings = read_sightings(text.as_bytes()).unwrap();
        assert_eq!(sightings.len(), 1);
        assert_eq!(sightings[0].name, "Jacutinga");
        assert_eq!(sightings[0].latitude, -22.9);
        assert_eq!(
            sightings[0].timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_read_sightings_rejects_bad_timestamp() {
        let text = "name,latitude,longitude,timestamp\nJacutinga,-22.9,-47.06,01/03/2024\n";
        assert!(matches!(
            read_sightings(text.as_bytes()),
            Err(CsvError::Csv(_))
        ));
    }

    #[test]
    fn test_enriched_roundtrip() {
        let sighting = Sighting {
            name: "Jacutinga".to_string(),
            latitude: -22.9,
            longitude: -47.06,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap(),
        };
        let weather = WeatherRecord {
            time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap(),
            latitude: -22.9,
            longitude: -47.06,
            temperature_c: 21.5,
            feels_like_c: 21.9,
            pressure_hpa: 1014.0,
            humidity_pct: 78.0,
            clouds_pct: 20.0,
            wind_speed: 2.06,
            wind_deg: 140.0,
            sunrise: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            sunset: Utc.with_ymd_and_hms(2024, 3, 1, 21, 30, 0).unwrap(),
            condition: "Clouds".to_string(),
            description: "few clouds, light breeze".to_string(),
        };
        let records = vec![EnrichedSighting::new(&sighting, weather)];

        let mut buffer = Vec::new();
        write_enriched(&mut buffer, &records).unwrap();

        let text = to_string(buffer.clone());
        assert_eq!(text.lines().next(), Some(ENRICHED_HEADER.join(",").as_str()));

        let read_back = read_enriched(buffer.as_slice()).unwrap();
        assert_eq!(read_back, records);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        let points = create_test_points();

        write_points_file(&path, &points).unwrap();
        let read_back = read_points_file(&path).unwrap();
        assert_eq!(read_back.len(), 3);
        assert_eq!(read_back[1].name, "Ninho, margem");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_points_file(dir.path().join("missing.csv"));
        assert!(matches!(result, Err(CsvError::Io(_))));
    }
}
