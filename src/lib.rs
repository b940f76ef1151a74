//! `tripdeck` - trip planning dashboard
//!
//! Serves a single page that shows the artifacts of an external trip search
//! (search queries, search results, hotel packages and a final HTML report)
//! in tabs, with advisory validation of the trip parameters in the sidebar.

pub mod api;
pub mod artifact;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod render;
pub mod validation;
pub mod view;
pub mod web;

// Re-export core types for public API
pub use artifact::{ArtifactKind, Record, Upload};
pub use config::DashboardConfig;
pub use dashboard::{DashboardInput, DashboardView, build_view};
pub use error::TripDeckError;
pub use render::{
    DisplayBlock, render_hotel_packages, render_html_report, render_search_queries,
    render_search_results,
};
pub use validation::{BudgetRange, TripParameters, TripType, validate_budget, validate_duration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripDeckError>;
