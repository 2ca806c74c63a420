use clap::{Parser, Subcommand};
use sighting_lib::{DEFAULT_BASE_URL, ExtractMode, FailurePolicy, WeatherConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Style marker used when `--style-marker` is given without a value
pub const DEFAULT_STYLE_MARKER: &str = "_polygon";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
/// Sighting tool - Extract KMZ placemarks, enrich sightings with historical weather and summarize temperatures
pub struct Settings {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract point placemarks from KMZ or KML files into a CSV file
    Extract {
        /// KMZ or KML files, extracted in parallel and written in argument order
        #[clap(required = true)]
        inputs: Vec<PathBuf>,

        /// Output CSV file
        #[clap(short, long)]
        output: PathBuf,

        /// Only keep placemarks whose styleUrl contains this marker, given as `--style-marker=M`
        /// (bare flag: "_polygon")
        #[clap(
            long,
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = DEFAULT_STYLE_MARKER
        )]
        style_marker: Option<String>,
    },

    /// Look up the weather of every sighting and print a temperature summary
    Enrich {
        /// Sightings CSV with name, latitude, longitude and timestamp columns
        input: PathBuf,

        /// Output CSV file for the enriched sightings
        #[clap(short, long)]
        output: PathBuf,

        /// OpenWeatherMap API key [env: OPENWEATHER_API_KEY]
        #[clap(long)]
        api_key: Option<String>,

        /// Weather API host
        #[clap(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Per-request timeout in seconds
        #[clap(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Drop sightings whose lookup fails instead of aborting
        #[clap(long)]
        skip_failed: bool,
    },

    /// Print the temperature summary of an enriched CSV file
    Summarize {
        /// Enriched CSV written by `enrich`
        input: PathBuf,
    },
}

impl Settings {
    /// Parse the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Self::try_parse() {
            Ok(settings) => settings,
            Err(e) => e.exit(),
        }
    }
}

/// Extraction mode selected by the optional style marker
pub fn extract_mode(style_marker: Option<&str>) -> ExtractMode {
    match style_marker {
        Some(marker) => ExtractMode::style_filtered(marker),
        None => ExtractMode::Unfiltered,
    }
}

/// Weather connection settings, taking the API key from the environment when not given
pub fn weather_config(api_key: Option<String>, base_url: &str, timeout_secs: u64) -> WeatherConfig {
    WeatherConfig {
        base_url: base_url.to_string(),
        api_key: api_key
            .or_else(|| get_env::<String>(API_KEY_ENV))
            .unwrap_or_default(),
        timeout: Duration::from_secs(timeout_secs),
    }
}

pub fn failure_policy(skip_failed: bool) -> FailurePolicy {
    if skip_failed {
        FailurePolicy::SkipFailed
    } else {
        FailurePolicy::AbortOnError
    }
}

/// Generic function to get environment variable, parsing it to the desired type.
pub fn get_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
