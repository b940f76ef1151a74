//! Configuration management for the `tripdeck` dashboard
//!
//! Handles loading configuration from files and environment variables,
//! and validates every setting before the server starts.

use crate::TripDeckError;
use crate::validation::{MAX_TRIP_DAYS, MIN_TRIP_DAYS, TripParameters, TripType, validate_budget};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Final report frame settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Values the sidebar starts with
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum size of one form submission in MB
    #[serde(default = "default_max_upload")]
    pub max_upload_mb: u32,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// PEM certificate, enables TLS together with `tls_key_path`
    #[serde(default)]
    pub tls_cert_path: Option<PathBuf>,
    /// PEM private key
    #[serde(default)]
    pub tls_key_path: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Final report frame settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Frame height in pixels
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    /// Whether the frame scrolls
    #[serde(default = "default_scrolling")]
    pub scrolling: bool,
}

/// Initial sidebar values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_budget")]
    pub budget: String,
    #[serde(default)]
    pub trip_type: TripType,
    /// Trip duration in days
    #[serde(default = "default_duration")]
    pub duration: u32,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_upload() -> u32 {
    200
}

fn default_request_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_frame_height() -> u32 {
    600
}

fn default_scrolling() -> bool {
    true
}

fn default_country() -> String {
    "Thailand".to_string()
}

fn default_city() -> String {
    "Bangkok".to_string()
}

fn default_budget() -> String {
    "$200-$800".to_string()
}

fn default_duration() -> u32 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload(),
            request_timeout_seconds: default_request_timeout(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            frame_height: default_frame_height(),
            scrolling: default_scrolling(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            city: default_city(),
            budget: default_budget(),
            trip_type: TripType::default(),
            duration: default_duration(),
        }
    }
}

impl DefaultsConfig {
    /// Sidebar values for a page with nothing submitted yet
    #[must_use]
    pub fn trip_parameters(&self) -> TripParameters {
        TripParameters {
            country: self.country.clone(),
            city: self.city.clone(),
            budget: self.budget.clone(),
            trip_type: self.trip_type.to_string(),
            duration: self.duration.to_string(),
        }
    }
}

impl ServerConfig {
    /// Upload limit in bytes
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb)
            .unwrap_or(usize::MAX)
            .saturating_mul(1024 * 1024)
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DashboardConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|p| p.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRIPDECK_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("TRIPDECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DashboardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripdeck").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.max_upload_mb == 0 {
            self.server.max_upload_mb = default_max_upload();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.report.frame_height == 0 {
            self.report.frame_height = default_frame_height();
        }
        if self.defaults.duration == 0 {
            self.defaults.duration = default_duration();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_server()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(TripDeckError::config("Server port cannot be 0").into());
        }

        if self.server.tls_cert_path.is_some() != self.server.tls_key_path.is_some() {
            return Err(TripDeckError::config(
                "TLS needs both tls_cert_path and tls_key_path",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.max_upload_mb > 1024 {
            return Err(TripDeckError::config("Upload limit cannot exceed 1024 MB").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(TripDeckError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if !(100..=5000).contains(&self.report.frame_height) {
            return Err(TripDeckError::config(
                "Report frame height must be between 100 and 5000 pixels",
            )
            .into());
        }

        if !(MIN_TRIP_DAYS..=MAX_TRIP_DAYS).contains(&i64::from(self.defaults.duration)) {
            return Err(TripDeckError::config(format!(
                "Default trip duration must be between {MIN_TRIP_DAYS} and {MAX_TRIP_DAYS} days"
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripDeckError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripDeckError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.defaults.budget.is_empty() && !validate_budget(&self.defaults.budget) {
            return Err(TripDeckError::config(format!(
                "Default budget '{}' does not look like $200-$800",
                self.defaults.budget
            ))
            .into());
        }

        Ok(())
    }
}
