//! Uploaded artifacts and read-only field access
//!
//! Artifacts are produced by an external generation step and uploaded as
//! files. They are decoded once per render and never modified.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{Result, TripDeckError};

/// Text substituted for fields missing from an artifact record
pub mod defaults {
    pub const HOTEL_NAME: &str = "Unknown Hotel";
    pub const LOCATION: &str = "Location not specified";
    pub const PRICE: &str = "Price not available";
    pub const RATING: &str = "N/A";
    pub const INCLUDED_MEALS: &str = "Not specified";
    pub const BOOKING_URL: &str = "#";

    pub const TITLE: &str = "No Title";
    pub const URL: &str = "No URL";
    pub const SNIPPET: &str = "No Snippet";
    pub const SCORE: &str = "N/A";
    pub const SEARCH_QUERY: &str = "No Query";
}

/// The four files the dashboard accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    SearchQueries,
    SearchResults,
    HotelPackages,
    HtmlReport,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::SearchQueries,
        ArtifactKind::SearchResults,
        ArtifactKind::HotelPackages,
        ArtifactKind::HtmlReport,
    ];

    /// Multipart field name used by the upload form
    #[must_use]
    pub fn form_field(self) -> &'static str {
        match self {
            ArtifactKind::SearchQueries => "search_queries",
            ArtifactKind::SearchResults => "search_results",
            ArtifactKind::HotelPackages => "trip_packages",
            ArtifactKind::HtmlReport => "html_report",
        }
    }

    #[must_use]
    pub fn from_form_field(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.form_field() == name)
    }

    /// Path segment used by the JSON render API
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            ArtifactKind::SearchQueries => "search-queries",
            ArtifactKind::SearchResults => "search-results",
            ArtifactKind::HotelPackages => "hotel-packages",
            ArtifactKind::HtmlReport => "html-report",
        }
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::SearchQueries => "Search Queries",
            ArtifactKind::SearchResults => "Search Results",
            ArtifactKind::HotelPackages => "Hotel Packages",
            ArtifactKind::HtmlReport => "HTML Report",
        }
    }
}

/// Raw bytes of one uploaded file
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: Option<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name,
            bytes: bytes.into(),
        }
    }

    /// Read an artifact from disk. A named file must not be empty.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| TripDeckError::artifact(path.display().to_string(), e.to_string()))?;
        if bytes.is_empty() {
            return Err(TripDeckError::artifact(path.display().to_string(), "file is empty"));
        }
        Ok(Self {
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            bytes,
        })
    }
}

/// Decode a JSON artifact. The top level must be an object.
pub fn parse_json_artifact(kind: ArtifactKind, bytes: &[u8]) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| TripDeckError::artifact(kind.label(), e.to_string()))?;

    match value {
        Value::Object(map) => {
            debug!(artifact = kind.label(), keys = map.len(), "Decoded artifact");
            Ok(map)
        }
        other => Err(TripDeckError::artifact(
            kind.label(),
            format!("expected a JSON object, found {}", json_type_name(&other)),
        )),
    }
}

/// Decode an HTML report as UTF-8 text.
pub fn parse_html_report(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        TripDeckError::artifact(ArtifactKind::HtmlReport.label(), format!("not valid UTF-8: {e}"))
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Text shown for a present JSON value.
///
/// Strings are shown verbatim, everything else as compact JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read-only view over one JSON object in an artifact
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Record<'a> {
    /// View over a value. Anything other than an object behaves as an empty record.
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self {
            fields: value.as_object(),
        }
    }

    #[must_use]
    pub fn from_map(map: &'a Map<String, Value>) -> Self {
        Self { fields: Some(map) }
    }

    /// Field value, treating `null` as absent
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields?.get(key).filter(|v| !v.is_null())
    }

    /// Display text of a field, or `default` when the field is absent
    #[must_use]
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .map_or_else(|| default.to_string(), display_value)
    }

    /// Elements of an array field. Absent or non-array fields yield `None`.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<&'a [Value]> {
        self.get(key).and_then(Value::as_array).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_or_defaults_missing_fields() {
        let value = json!({"hotel_name": "Siam Palace"});
        let record = Record::new(&value);
        assert_eq!(record.get_or("hotel_name", defaults::HOTEL_NAME), "Siam Palace");
        assert_eq!(record.get_or("location", defaults::LOCATION), "Location not specified");
    }

    #[test]
    fn test_get_or_formats_non_strings() {
        let value = json!({"price": 120, "rating": 4.5, "pool": true, "tags": ["a", "b"]});
        let record = Record::new(&value);
        assert_eq!(record.get_or("price", defaults::PRICE), "120");
        assert_eq!(record.get_or("rating", defaults::RATING), "4.5");
        assert_eq!(record.get_or("pool", "-"), "true");
        assert_eq!(record.get_or("tags", "-"), r#"["a","b"]"#);
    }

    #[test]
    fn test_null_is_treated_as_absent() {
        let value = json!({"rating": null});
        let record = Record::new(&value);
        assert_eq!(record.get_or("rating", defaults::RATING), "N/A");
        assert!(record.get("rating").is_none());
    }

    #[test]
    fn test_non_object_record_is_empty() {
        let value = json!("just a string");
        let record = Record::new(&value);
        assert_eq!(record.get_or("title", defaults::TITLE), "No Title");
        assert!(record.list("activities").is_none());
    }

    #[test]
    fn test_list_ignores_non_arrays() {
        let value = json!({"activities": "snorkeling", "queries": ["a"]});
        let record = Record::new(&value);
        assert!(record.list("activities").is_none());
        assert_eq!(record.list("queries").map(<[Value]>::len), Some(1));
    }

    #[test]
    fn test_parse_json_artifact() {
        let map = parse_json_artifact(ArtifactKind::SearchQueries, br#"{"queries": ["x"]}"#)
            .unwrap();
        assert!(map.contains_key("queries"));
    }

    #[test]
    fn test_parse_json_artifact_rejects_invalid_json() {
        let err = parse_json_artifact(ArtifactKind::SearchResults, b"{not json").unwrap_err();
        assert!(matches!(err, TripDeckError::Artifact { .. }));
        assert!(err.to_string().starts_with("Search Results: "));
    }

    #[test]
    fn test_parse_json_artifact_rejects_non_objects() {
        let err = parse_json_artifact(ArtifactKind::HotelPackages, b"[1, 2]").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Hotel Packages: expected a JSON object, found an array"
        );
    }

    #[test]
    fn test_parse_html_report() {
        assert_eq!(parse_html_report(b"<h1>Hi</h1>").unwrap(), "<h1>Hi</h1>");
        assert!(parse_html_report(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let err = Upload::read(Path::new("/nonexistent/packages.json")).unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/packages.json: "));
    }

    #[test]
    fn test_read_empty_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("tripdeck-empty-{}.json", std::process::id()));
        std::fs::write(&path, b"").unwrap();
        let err = Upload::read(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(err.to_string(), format!("{}: file is empty", path.display()));
    }

    #[test]
    fn test_form_field_round_trip() {
        for kind in ArtifactKind::ALL {
            assert_eq!(ArtifactKind::from_form_field(kind.form_field()), Some(kind));
            assert_eq!(ArtifactKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(ArtifactKind::from_form_field("country"), None);
    }
}
