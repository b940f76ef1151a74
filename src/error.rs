//! Error types and handling for the `tripdeck` dashboard

use thiserror::Error;

/// Main error type for the dashboard
#[derive(Error, Debug)]
pub enum TripDeckError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// An uploaded artifact could not be decoded
    #[error("{artifact}: {message}")]
    Artifact { artifact: String, message: String },
}

impl TripDeckError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new artifact decoding error
    pub fn artifact<A: Into<String>, S: Into<String>>(artifact: A, message: S) -> Self {
        Self::Artifact {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripDeckError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            TripDeckError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TripDeckError::Artifact { .. } => format!("Error loading data: {self}"),
        }
    }
}
