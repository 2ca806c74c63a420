//! Aggregate statistics over extracted points and enriched sightings

use crate::point::GeoPoint;
use crate::sighting::EnrichedSighting;

use geo::{BoundingRect, MultiPoint, Point, Rect};
use std::collections::BTreeMap;

/// Temperature statistics for one sighting name
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSummary {
    /// Sighting name the statistics are grouped by
    pub group: String,
    pub count: usize,
    pub mean_c: f64,
    pub min_c: f64,
    pub max_c: f64,
    /// Bounding box of the sightings in degrees (x = longitude, y = latitude)
    pub bounds: Option<Rect<f64>>,
}

/// Point count and extent of one folder
#[derive(Debug, Clone, PartialEq)]
pub struct FolderSummary {
    pub folder: String,
    pub count: usize,
    /// Bounding box of the points in degrees (x = longitude, y = latitude)
    pub bounds: Option<Rect<f64>>,
}

/// Mean, minimum and maximum temperature per sighting name, sorted by name
pub fn summarize(records: &[EnrichedSighting]) -> Vec<TemperatureSummary> {
    #[cfg(feature = "profiling")]
    profiling::scope!("summary::summarize");

    let mut groups: BTreeMap<&str, Vec<&EnrichedSighting>> = BTreeMap::new();
    for record in records {
        groups.entry(record.name.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(group, members)| {
            let count = members.len();
            let (sum, min_c, max_c) = members.iter().fold(
                (0.0, f64::INFINITY, f64::NEG_INFINITY),
                |(sum, min, max), record| {
                    (
                        sum + record.temperature_c,
                        min.min(record.temperature_c),
                        max.max(record.temperature_c),
                    )
                },
            );

            TemperatureSummary {
                group: group.to_string(),
                count,
                mean_c: sum / count as f64,
                min_c,
                max_c,
                bounds: bounds(members.iter().map(|record| record.position())),
            }
        })
        .collect()
}

/// Point count and bounding box per folder, sorted by folder name
pub fn summarize_folders(points: &[GeoPoint]) -> Vec<FolderSummary> {
    let mut groups: BTreeMap<&str, Vec<Point<f64>>> = BTreeMap::new();
    for point in points {
        groups
            .entry(point.folder.as_str())
            .or_default()
            .push(point.position());
    }

    groups
        .into_iter()
        .map(|(folder, positions)| FolderSummary {
            folder: folder.to_string(),
            count: positions.len(),
            bounds: bounds(positions),
        })
        .collect()
}

fn bounds(positions: impl IntoIterator<Item = Point<f64>>) -> Option<Rect<f64>> {
    MultiPoint::from_iter(positions).bounding_rect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create_test_record(name: &str, temperature_c: f64, lat: f64, lon: f64) -> EnrichedSighting {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        EnrichedSighting {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            timestamp: time,
            weather_time: time,
            temperature_c,
            feels_like_c: temperature_c,
            pressure_hpa: 1013.0,
            humidity_pct: 70.0,
            clouds_pct: 10.0,
            wind_speed: 1.5,
            wind_deg: 180.0,
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            sunrise: time,
            sunset: time,
        }
    }

    #[test]
    fn test_summarize_groups_by_name() {
        let records = vec![
            create_test_record("Jacutinga", 20.0, -22.0, -47.0),
            create_test_record("Araponga", 15.0, -23.0, -46.0),
            create_test_record("Jacutinga", 26.0, -22.5, -47.5),
            create_test_record("Jacutinga", 17.0, -21.5, -46.5),
        ];

        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 2);

        // Sorted by group name
        assert_eq!(summaries[0].group, "Araponga");
        assert_eq!(summaries[0].count, 1);
        assert_eq!(summaries[0].mean_c, 15.0);

        let jacutinga = &summaries[1];
        assert_eq!(jacutinga.count, 3);
        assert!((jacutinga.mean_c - 21.0).abs() < 1e-9);
        assert_eq!(jacutinga.min_c, 17.0);
        assert_eq!(jacutinga.max_c, 26.0);

        let bounds = jacutinga.bounds.unwrap();
        assert_eq!(bounds.min().x, -47.5);
        assert_eq!(bounds.max().x, -46.5);
        assert_eq!(bounds.min().y, -22.5);
        assert_eq!(bounds.max().y, -21.5);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_summarize_folders() {
        let points = vec![
            GeoPoint::new("Aves", "a", "1,2".parse().unwrap()),
            GeoPoint::new("Root", "b", "3,4".parse().unwrap()),
            GeoPoint::new("Aves", "c", "5,6".parse().unwrap()),
        ];

        let summaries = summarize_folders(&points);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].folder, "Aves");
        assert_eq!(summaries[0].count, 2);

        let bounds = summaries[0].bounds.unwrap();
        assert_eq!(bounds.min().x, 1.0);
        assert_eq!(bounds.max().y, 6.0);
        assert_eq!(summaries[1].folder, "Root");
        assert_eq!(summaries[1].count, 1);
    }
}
