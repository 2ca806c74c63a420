//! Fixtures shared by unit tests

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Build an in-memory ZIP archive from `(entry name, contents)` pairs, in order
pub(crate) fn kmz(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Wrap `body` in a namespaced KML document
pub(crate) fn kml_document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2">
<Document>
<name>Sightings</name>
{body}
</Document>
</kml>"#
    )
}

/// A point placemark with an optional style reference
pub(crate) fn placemark(name: &str, style_url: Option<&str>, coordinates: &str) -> String {
    let style = style_url
        .map(|url| format!("<styleUrl>{url}</styleUrl>"))
        .unwrap_or_default();
    format!(
        "<Placemark><name>{name}</name>{style}<Point><coordinates>{coordinates}</coordinates></Point></Placemark>"
    )
}

/// A placemark carrying only a line geometry
pub(crate) fn line_placemark(name: &str) -> String {
    format!(
        "<Placemark><name>{name}</name><LineString><coordinates>10,20,0 11,21,0</coordinates></LineString></Placemark>"
    )
}
