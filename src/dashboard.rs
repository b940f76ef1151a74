//! Dashboard assembly
//!
//! One call to [`build_view`] is one full evaluation of the page: the sidebar
//! values are validated, every uploaded artifact is decoded and rendered, and
//! a failure in one artifact only affects its own tab.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::TripDeckError;
use crate::artifact::{ArtifactKind, Upload, parse_html_report, parse_json_artifact};
use crate::config::ReportConfig;
use crate::render::{
    DisplayBlock, NoticeLevel, render_hotel_packages, render_html_report, render_search_queries,
    render_search_results,
};
use crate::validation::{FieldWarning, TripParameters};

/// Where an artifact's content came from
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    Uploaded(Upload),
    /// The file was named but could not be read
    Unreadable { message: String },
}

/// Everything one render needs
#[derive(Debug, Clone)]
pub struct DashboardInput {
    pub params: TripParameters,
    pub search_queries: Option<ArtifactSource>,
    pub search_results: Option<ArtifactSource>,
    pub trip_packages: Option<ArtifactSource>,
    pub html_report: Option<ArtifactSource>,
}

impl DashboardInput {
    #[must_use]
    pub fn new(params: TripParameters) -> Self {
        Self {
            params,
            search_queries: None,
            search_results: None,
            trip_packages: None,
            html_report: None,
        }
    }

    /// Attach an upload. Empty files count as not uploaded.
    pub fn set_upload(&mut self, kind: ArtifactKind, upload: Upload) {
        *self.slot_mut(kind) = (!upload.bytes.is_empty()).then_some(ArtifactSource::Uploaded(upload));
    }

    /// Record that a named artifact file could not be read.
    pub fn set_unreadable(&mut self, kind: ArtifactKind, error: &TripDeckError) {
        *self.slot_mut(kind) = Some(ArtifactSource::Unreadable {
            message: error.to_string(),
        });
    }

    fn slot_mut(&mut self, kind: ArtifactKind) -> &mut Option<ArtifactSource> {
        match kind {
            ArtifactKind::SearchQueries => &mut self.search_queries,
            ArtifactKind::SearchResults => &mut self.search_results,
            ArtifactKind::HotelPackages => &mut self.trip_packages,
            ArtifactKind::HtmlReport => &mut self.html_report,
        }
    }

    #[must_use]
    pub fn source(&self, kind: ArtifactKind) -> Option<&ArtifactSource> {
        match kind {
            ArtifactKind::SearchQueries => self.search_queries.as_ref(),
            ArtifactKind::SearchResults => self.search_results.as_ref(),
            ArtifactKind::HotelPackages => self.trip_packages.as_ref(),
            ArtifactKind::HtmlReport => self.html_report.as_ref(),
        }
    }
}

/// One tab of the main area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub artifact: ArtifactKind,
    pub title: &'static str,
    pub blocks: Vec<DisplayBlock>,
}

/// Fully evaluated page, ready to paint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub params: TripParameters,
    pub warnings: Vec<FieldWarning>,
    pub tabs: Vec<Tab>,
}

impl DashboardView {
    #[must_use]
    pub fn tab(&self, artifact: ArtifactKind) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.artifact == artifact)
    }
}

fn tab_title(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::SearchQueries => "Search Queries",
        ArtifactKind::SearchResults => "Search Results",
        ArtifactKind::HotelPackages => "Hotel Packages",
        ArtifactKind::HtmlReport => "Final Report",
    }
}

fn placeholder(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::SearchQueries => "Upload search queries JSON file to view results",
        ArtifactKind::SearchResults => "Upload search results JSON file to view results",
        ArtifactKind::HotelPackages => "Upload trip packages JSON file to view hotel options",
        ArtifactKind::HtmlReport => "Upload HTML report file to view the final report",
    }
}

/// Evaluate the whole page for one set of inputs.
#[instrument(skip_all, fields(city = %input.params.city))]
pub fn build_view(input: &DashboardInput, report: &ReportConfig) -> DashboardView {
    let warnings = input.params.validate();
    for warning in &warnings {
        debug!(field = ?warning.field, "{}", warning.message);
    }

    let tabs = ArtifactKind::ALL
        .into_iter()
        .map(|kind| Tab {
            artifact: kind,
            title: tab_title(kind),
            blocks: render_tab(kind, input.source(kind), report),
        })
        .collect();

    DashboardView {
        params: input.params.clone(),
        warnings,
        tabs,
    }
}

fn render_tab(
    kind: ArtifactKind,
    source: Option<&ArtifactSource>,
    report: &ReportConfig,
) -> Vec<DisplayBlock> {
    let upload = match source {
        None => return vec![DisplayBlock::notice(NoticeLevel::Info, placeholder(kind))],
        Some(ArtifactSource::Unreadable { message }) => {
            warn!(artifact = kind.label(), "Artifact file unreadable: {message}");
            return vec![DisplayBlock::notice(
                NoticeLevel::Error,
                format!("Error loading data: {message}"),
            )];
        }
        Some(ArtifactSource::Uploaded(upload)) => upload,
    };

    let rendered = match kind {
        ArtifactKind::SearchQueries => parse_json_artifact(kind, &upload.bytes)
            .map(|data| render_search_queries(&data)),
        ArtifactKind::SearchResults => parse_json_artifact(kind, &upload.bytes)
            .map(|data| render_search_results(&data)),
        ArtifactKind::HotelPackages => parse_json_artifact(kind, &upload.bytes)
            .map(|data| render_hotel_packages(Some(&data))),
        ArtifactKind::HtmlReport => parse_html_report(&upload.bytes)
            .map(|html| render_html_report(&html, report.frame_height, report.scrolling)),
    };

    rendered.unwrap_or_else(|e| {
        warn!(
            artifact = kind.label(),
            file = upload.file_name.as_deref().unwrap_or("<unnamed>"),
            "Failed to load artifact: {e}"
        );
        vec![DisplayBlock::notice(NoticeLevel::Error, e.user_message())]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsConfig;

    fn input() -> DashboardInput {
        DashboardInput::new(DefaultsConfig::default().trip_parameters())
    }

    fn upload(bytes: &[u8]) -> Upload {
        Upload::new(Some("artifact.json".to_string()), bytes)
    }

    #[test]
    fn test_empty_input_shows_placeholders() {
        let view = build_view(&input(), &ReportConfig::default());
        let titles: Vec<&str> = view.tabs.iter().map(|t| t.title).collect();
        assert_eq!(
            titles,
            vec!["Search Queries", "Search Results", "Hotel Packages", "Final Report"]
        );
        for tab in &view.tabs {
            assert_eq!(tab.blocks.len(), 1);
            assert!(matches!(
                tab.blocks[0],
                DisplayBlock::Notice { level: NoticeLevel::Info, .. }
            ));
        }
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn test_empty_upload_counts_as_missing() {
        let mut input = input();
        input.set_upload(ArtifactKind::SearchQueries, upload(b""));
        assert!(input.search_queries.is_none());
    }

    #[test]
    fn test_broken_artifact_only_affects_its_tab() {
        let mut input = input();
        input.set_upload(ArtifactKind::SearchResults, upload(b"{\"results\": ["));
        input.set_upload(ArtifactKind::SearchQueries, upload(br#"{"queries": ["spa"]}"#));

        let view = build_view(&input, &ReportConfig::default());

        let results = view.tab(ArtifactKind::SearchResults).unwrap();
        let DisplayBlock::Notice { level, message } = &results.blocks[0] else {
            panic!("expected notice");
        };
        assert_eq!(*level, NoticeLevel::Error);
        assert!(message.starts_with("Error loading data: Search Results:"));

        let queries = view.tab(ArtifactKind::SearchQueries).unwrap();
        assert_eq!(
            queries.blocks,
            vec![DisplayBlock::Line {
                label: "Query 1:".to_string(),
                text: "spa".to_string(),
            }]
        );
    }

    #[test]
    fn test_unreadable_file_is_an_error_notice() {
        let mut input = input();
        let err = TripDeckError::artifact("packages.json", "No such file or directory");
        input.set_unreadable(ArtifactKind::HotelPackages, &err);

        let view = build_view(&input, &ReportConfig::default());
        assert_eq!(
            view.tab(ArtifactKind::HotelPackages).unwrap().blocks,
            vec![DisplayBlock::notice(
                NoticeLevel::Error,
                "Error loading data: packages.json: No such file or directory"
            )]
        );
    }

    #[test]
    fn test_report_uses_frame_settings() {
        let mut input = input();
        input.set_upload(ArtifactKind::HtmlReport, upload(b"<h1>Report</h1>"));
        let report = ReportConfig {
            frame_height: 900,
            scrolling: false,
        };

        let view = build_view(&input, &report);
        assert_eq!(
            view.tab(ArtifactKind::HtmlReport).unwrap().blocks,
            vec![DisplayBlock::Frame {
                html: "<h1>Report</h1>".to_string(),
                height: 900,
                scrolling: false,
            }]
        );
    }

    #[test]
    fn test_non_utf8_report_is_an_error_notice() {
        let mut input = input();
        input.set_upload(ArtifactKind::HtmlReport, upload(&[0xc3, 0x28]));
        let view = build_view(&input, &ReportConfig::default());
        assert!(matches!(
            view.tab(ArtifactKind::HtmlReport).unwrap().blocks[0],
            DisplayBlock::Notice { level: NoticeLevel::Error, .. }
        ));
    }

    #[test]
    fn test_invalid_parameters_still_render() {
        let mut input = input();
        input.params.budget = "a lot".to_string();
        input.set_upload(ArtifactKind::HotelPackages, upload(br#"{"packages": [{}]}"#));

        let view = build_view(&input, &ReportConfig::default());
        assert_eq!(view.warnings.len(), 1);
        assert!(matches!(
            view.tab(ArtifactKind::HotelPackages).unwrap().blocks[0],
            DisplayBlock::HotelCard(_)
        ));
    }

    #[test]
    fn test_build_view_is_idempotent() {
        let mut input = input();
        input.set_upload(
            ArtifactKind::HotelPackages,
            upload(br#"{"packages": [{"hotel_name": "A"}, {"hotel_name": "B"}]}"#),
        );
        let report = ReportConfig::default();
        assert_eq!(build_view(&input, &report), build_view(&input, &report));
    }
}
