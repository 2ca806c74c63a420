use crate::settings::{Command, extract_mode, failure_policy, weather_config};
use sighting_lib::csv_io::{self, CsvError};
use sighting_lib::{
    EnrichError, ExtractError, ExtractReport, OpenWeatherClient, TemperatureSummary, WeatherError,
    enrich, extract_file, extract_files_parallel, summarize, summarize_folders,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Errors surfaced by the command line tool
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Run a parsed command to completion
pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Extract {
            inputs,
            output,
            style_marker,
        } => run_extract(&inputs, &output, style_marker.as_deref()),
        Command::Enrich {
            input,
            output,
            api_key,
            base_url,
            timeout_secs,
            skip_failed,
        } => {
            let client = OpenWeatherClient::new(weather_config(api_key, &base_url, timeout_secs))?;
            let sightings = csv_io::read_sightings_file(&input)?;
            tracing::info!("Read {} sightings from {}", sightings.len(), input.display());

            let report = enrich(&client, &sightings, failure_policy(skip_failed)).await?;
            csv_io::write_enriched_file(&output, &report.records)?;
            tracing::info!(
                "Wrote {} enriched sightings to {}",
                report.records.len(),
                output.display()
            );

            print_summary(&summarize(&report.records))
        }
        Command::Summarize { input } => {
            let records = csv_io::read_enriched_file(&input)?;
            print_summary(&summarize(&records))
        }
    }
}

fn run_extract(inputs: &[PathBuf], output: &Path, style_marker: Option<&str>) -> Result<()> {
    let mode = extract_mode(style_marker);

    let reports = match inputs {
        [single] => vec![extract_file(single, &mode)?],
        _ => extract_files_parallel(inputs, &mode)?,
    };

    for (input, report) in inputs.iter().zip(&reports) {
        log_report(input, report);
    }

    let points: Vec<_> = reports.into_iter().flat_map(|report| report.points).collect();
    csv_io::write_points_file(output, &points)?;
    tracing::info!("Wrote {} points to {}", points.len(), output.display());

    for folder in summarize_folders(&points) {
        tracing::info!("Folder {:?}: {} points", folder.folder, folder.count);
    }

    Ok(())
}

fn log_report(input: &Path, report: &ExtractReport) {
    tracing::info!(
        "{} ({}): {} of {} placemarks extracted",
        input.display(),
        report.document,
        report.points.len(),
        report.placemark_count()
    );
    if report.skipped.total() > 0 {
        tracing::info!(
            "Skipped {} without point, {} by style, {} with invalid coordinates",
            report.skipped.without_point,
            report.skipped.style_mismatch,
            report.skipped.invalid_coordinates
        );
    }
}

fn print_summary(summaries: &[TemperatureSummary]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_summary(&mut stdout, summaries)?;
    Ok(())
}

/// Write the temperature summary as an aligned text table
fn write_summary<W: Write>(out: &mut W, summaries: &[TemperatureSummary]) -> std::io::Result<()> {
    let width = summaries
        .iter()
        .map(|summary| summary.group.chars().count())
        .chain(std::iter::once("name".len()))
        .max()
        .unwrap_or(4);

    writeln!(
        out,
        "{:<width$}  {:>5}  {:>8}  {:>8}  {:>8}",
        "name", "count", "mean_c", "min_c", "max_c"
    )?;
    for summary in summaries {
        writeln!(
            out,
            "{:<width$}  {:>5}  {:>8.2}  {:>8.2}  {:>8.2}",
            summary.group, summary.count, summary.mean_c, summary.min_c, summary.max_c
        )?;
    }
    out.flush()
}
