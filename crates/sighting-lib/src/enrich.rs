//! Sequential weather enrichment of sightings
//!
//! One lookup per sighting, awaited in order. There is no batching, retry or rate
//! limiting; what happens on a failed lookup is decided by the [`FailurePolicy`].

use crate::sighting::{EnrichedSighting, Sighting};
use crate::weather::{WeatherError, WeatherSource};

/// What to do when a single weather lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and return the error (all-or-nothing)
    #[default]
    AbortOnError,
    /// Log the failure, drop that sighting and keep going (partial results)
    SkipFailed,
}

/// A lookup failure that aborted enrichment
#[derive(Debug, thiserror::Error)]
#[error("Weather lookup failed for sighting #{index} ({name}): {source}")]
pub struct EnrichError {
    /// Position of the failed sighting in the input
    pub index: usize,
    pub name: String,
    #[source]
    pub source: WeatherError,
}

/// Outcome of an enrichment run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichReport {
    /// Enriched sightings, in input order
    pub records: Vec<EnrichedSighting>,
    /// Input positions of sightings dropped under [`FailurePolicy::SkipFailed`]
    pub failed: Vec<usize>,
}

/// Look up the weather of every sighting, one request at a time
pub async fn enrich<S: WeatherSource>(
    source: &S,
    sightings: &[Sighting],
    policy: FailurePolicy,
) -> Result<EnrichReport, EnrichError> {
    let mut report = EnrichReport {
        records: Vec::with_capacity(sightings.len()),
        failed: Vec::new(),
    };

    for (index, sighting) in sightings.iter().enumerate() {
        match source.fetch(&sighting.query()).await {
            Ok(weather) => {
                report
                    .records
                    .push(EnrichedSighting::new(sighting, weather));
            }
            Err(err) => match policy {
                FailurePolicy::AbortOnError => {
                    return Err(EnrichError {
                        index,
                        name: sighting.name.clone(),
                        source: err,
                    });
                }
                FailurePolicy::SkipFailed => {
                    tracing::warn!(
                        "Skipping sighting #{} ({}) at {}: {}",
                        index,
                        sighting.name,
                        sighting.timestamp,
                        err
                    );
                    report.failed.push(index);
                }
            },
        }
    }

    tracing::info!(
        "Enriched {} of {} sightings",
        report.records.len(),
        sightings.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{WeatherQuery, WeatherRecord};
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;

    /// Answers every query with a fixed temperature, failing for one latitude
    struct FakeSource {
        fail_latitude: Option<f64>,
        queries: RefCell<Vec<WeatherQuery>>,
    }

    impl FakeSource {
        fn new(fail_latitude: Option<f64>) -> Self {
            Self {
                fail_latitude,
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl WeatherSource for FakeSource {
        async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherRecord, WeatherError> {
            self.queries.borrow_mut().push(*query);

            if self.fail_latitude == Some(query.latitude) {
                return Err(WeatherError::HttpStatus {
                    status: 404,
                    message: "no data".to_string(),
                });
            }

            Ok(WeatherRecord {
                time: query.time,
                latitude: query.latitude,
                longitude: query.longitude,
                temperature_c: query.latitude.abs(),
                feels_like_c: query.latitude.abs(),
                pressure_hpa: 1013.0,
                humidity_pct: 80.0,
                clouds_pct: 0.0,
                wind_speed: 1.0,
                wind_deg: 90.0,
                sunrise: query.time,
                sunset: query.time,
                condition: "Clear".to_string(),
                description: "clear sky".to_string(),
            })
        }
    }

    fn create_test_sightings() -> Vec<Sighting> {
        (0..4)
            .map(|i| Sighting {
                name: format!("bird-{i}"),
                latitude: -20.0 - i as f64,
                longitude: -47.0,
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9 + i, 0, 0).unwrap(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_enrich_all_succeed() {
        let source = FakeSource::new(None);
        let sightings = create_test_sightings();

        let report = enrich(&source, &sightings, FailurePolicy::default())
            .await
            .unwrap();

        assert_eq!(report.records.len(), 4);
        assert!(report.failed.is_empty());
        assert_eq!(report.records[2].name, "bird-2");
        assert_eq!(report.records[2].temperature_c, 22.0);
        assert_eq!(source.queries.borrow().len(), 4);
    }

    #[tokio::test]
    async fn test_abort_on_error_stops_the_batch() {
        let source = FakeSource::new(Some(-21.0));
        let sightings = create_test_sightings();

        let err = enrich(&source, &sightings, FailurePolicy::AbortOnError)
            .await
            .unwrap_err();

        assert_eq!(err.index, 1);
        assert_eq!(err.name, "bird-1");
        assert!(matches!(err.source, WeatherError::HttpStatus { status: 404, .. }));
        // Nothing after the failing sighting was requested
        assert_eq!(source.queries.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_skip_failed_returns_partial_results() {
        let source = FakeSource::new(Some(-21.0));
        let sightings = create_test_sightings();

        let report = enrich(&source, &sightings, FailurePolicy::SkipFailed)
            .await
            .unwrap();

        assert_eq!(report.failed, vec![1]);
        let names: Vec<_> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bird-0", "bird-2", "bird-3"]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let source = FakeSource::new(None);
        let report = enrich(&source, &[], FailurePolicy::AbortOnError)
            .await
            .unwrap();
        assert!(report.records.is_empty());
    }
}
