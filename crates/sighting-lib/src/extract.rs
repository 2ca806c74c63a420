//! KMZ/KML point extraction
//!
//! A KMZ archive is searched for its first `.kml` entry (in archive enumeration order),
//! the entry is parsed as an XML tree, and every placemark carrying a `Point` geometry is
//! turned into a [`GeoPoint`]. Placemarks with only line or polygon geometry are never
//! emitted.

use crate::folder_index::FolderIndex;
use crate::point::{Coordinate, CoordinateError, GeoPoint, UNNAMED};
use crate::{ExtractError, Result, kml};

use rayon::prelude::*;
use std::io::{Cursor, Read};
use std::path::Path;

/// Extension of plain KML files on disk, compared case-insensitively
const KML_EXTENSION: &str = "kml";

/// Suffix identifying the markup entry inside a container, compared exactly
const KML_ENTRY_SUFFIX: &str = ".kml";

/// Which point-bearing placemarks are emitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtractMode {
    /// Every placemark with a point geometry
    #[default]
    Unfiltered,
    /// Only placemarks whose direct `styleUrl` contains the marker substring
    StyleFiltered(String),
}

impl ExtractMode {
    /// Style-filtered mode for the given marker
    pub fn style_filtered(marker: impl Into<String>) -> Self {
        Self::StyleFiltered(marker.into())
    }

    /// True if a placemark with this style reference passes the filter
    #[inline]
    pub fn accepts(&self, style_url: Option<&str>) -> bool {
        match self {
            Self::Unfiltered => true,
            Self::StyleFiltered(marker) => style_url.is_some_and(|url| url.contains(marker.as_str())),
        }
    }
}

/// Placemarks that were seen but not emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Placemarks without a point geometry (lines, polygons, empty)
    pub without_point: usize,
    /// Point placemarks rejected by the style filter
    pub style_mismatch: usize,
    /// Point placemarks whose coordinates could not be parsed
    pub invalid_coordinates: usize,
}

impl SkipCounts {
    /// Total number of skipped placemarks
    pub fn total(&self) -> usize {
        self.without_point + self.style_mismatch + self.invalid_coordinates
    }
}

/// Result of extracting one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractReport {
    /// Archive entry or file the points were read from
    pub document: String,
    /// Emitted points, in document order
    pub points: Vec<GeoPoint>,
    /// Placemarks that were not emitted
    pub skipped: SkipCounts,
}

impl ExtractReport {
    fn new(document: &str) -> Self {
        Self {
            document: document.to_string(),
            ..Self::default()
        }
    }

    /// Number of placemarks found in the document
    pub fn placemark_count(&self) -> usize {
        self.points.len() + self.skipped.total()
    }
}

/// Extract the points of the first KML document inside a KMZ container
///
/// # Errors
/// [`ExtractError::InvalidContainer`] if the bytes are not a ZIP archive,
/// [`ExtractError::NoDocumentFound`] if no entry name ends with `.kml`, and
/// [`ExtractError::MalformedDocument`] if the entry cannot be read or parsed.
pub fn extract(container: &[u8], mode: &ExtractMode) -> Result<Vec<GeoPoint>> {
    extract_report(container, mode).map(|report| report.points)
}

/// Like [`extract`], also reporting which document was used and what was skipped
pub fn extract_report(container: &[u8], mode: &ExtractMode) -> Result<ExtractReport> {
    #[cfg(feature = "profiling")]
    profiling::scope!("extract::extract_report");

    let (entry, xml) = read_kml_entry(container)?;
    extract_document(&entry, &xml, mode)
}

/// Extract the points of an already decompressed KML document
pub fn extract_kml(xml: &str, mode: &ExtractMode) -> Result<ExtractReport> {
    extract_document("document.kml", xml, mode)
}

/// Extract the points of a `.kmz` file, or of a plain `.kml` file by extension
pub fn extract_file<P: AsRef<Path>>(path: P, mode: &ExtractMode) -> Result<ExtractReport> {
    let path = path.as_ref();

    if has_kml_extension(path) {
        let document = path.display().to_string();
        let xml = String::from_utf8(std::fs::read(path)?).map_err(|err| {
            ExtractError::MalformedDocument {
                entry: document.clone(),
                reason: err.to_string(),
            }
        })?;
        extract_document(&document, &xml, mode)
    } else {
        let container = std::fs::read(path)?;
        extract_report(&container, mode)
    }
}

/// Extract several files in parallel
///
/// Every document is processed independently with its own folder index. Reports are
/// returned in input order; the first fatal error aborts the whole batch.
pub fn extract_files_parallel<P: AsRef<Path> + Sync>(
    paths: &[P],
    mode: &ExtractMode,
) -> Result<Vec<ExtractReport>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("extract::extract_files_parallel");

    paths
        .par_iter()
        .map(|path| extract_file(path, mode))
        .collect()
}

fn has_kml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(KML_EXTENSION))
}

/// Locate the first `.kml` entry and read it as text
fn read_kml_entry(container: &[u8]) -> Result<(String, String)> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(container)).map_err(ExtractError::InvalidContainer)?;

    let mut selected = None;
    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(ExtractError::InvalidContainer)?;
        if !entry.is_dir() && entry.name().ends_with(KML_ENTRY_SUFFIX) {
            selected = Some((index, entry.name().to_string()));
            break;
        }
    }
    let (index, name) = selected.ok_or(ExtractError::NoDocumentFound)?;

    let malformed = |reason: String| ExtractError::MalformedDocument {
        entry: name.clone(),
        reason,
    };

    let mut entry = archive
        .by_index(index)
        .map_err(|err| malformed(err.to_string()))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|err| malformed(err.to_string()))?;

    tracing::debug!("Selected {} ({} bytes) from container", name, xml.len());
    Ok((name, xml))
}

/// Walk one KML document and collect its points
fn extract_document(document: &str, xml: &str, mode: &ExtractMode) -> Result<ExtractReport> {
    #[cfg(feature = "profiling")]
    profiling::scope!("extract::extract_document");

    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let tree = roxmltree::Document::parse_with_options(xml, options).map_err(|err| {
        ExtractError::MalformedDocument {
            entry: document.to_string(),
            reason: err.to_string(),
        }
    })?;

    // Enumeration order assigns the stable placemark index
    let placemarks: Vec<_> = tree
        .descendants()
        .filter(|node| kml::is_element(*node, kml::PLACEMARK))
        .collect();
    let folders = FolderIndex::build(&placemarks);

    let mut report = ExtractReport::new(document);

    for (index, placemark) in placemarks.iter().enumerate() {
        let Some(point) = placemark
            .descendants()
            .find(|node| kml::is_element(*node, kml::POINT))
        else {
            report.skipped.without_point += 1;
            continue;
        };

        if !mode.accepts(kml::child_text(*placemark, kml::STYLE_URL)) {
            report.skipped.style_mismatch += 1;
            continue;
        }

        let name = kml::child_text(*placemark, kml::NAME).unwrap_or(UNNAMED);

        let coordinate = kml::child(point, kml::COORDINATES)
            .ok_or(CoordinateError::Missing)
            .and_then(|node| node.text().unwrap_or_default().parse::<Coordinate>());

        match coordinate {
            Ok(coordinate) => {
                report
                    .points
                    .push(GeoPoint::new(folders.folder_of(index), name, coordinate));
            }
            Err(err) => {
                tracing::warn!(
                    "Skipping placemark #{} ({}) in {}: {}",
                    index,
                    name,
                    document,
                    err
                );
                report.skipped.invalid_coordinates += 1;
            }
        }
    }

    tracing::debug!(
        "Extracted {} of {} placemarks from {}",
        report.points.len(),
        placemarks.len(),
        document
    );

    Ok(report)
}
