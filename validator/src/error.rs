//! Validator error types

use std::time::Duration;
use thiserror::Error;

/// Result type for validator operations
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// Validator error types
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Configuration error in {field}: {reason}")]
    ConfigurationError { field: String, reason: String },

    #[error("Probe {probe} failed: {message}")]
    ProbeFailed { probe: String, message: String },

    #[error("Probe {probe} timed out after {timeout:?}")]
    ProbeTimeout { probe: String, timeout: Duration },

    #[error("Overall health {score:.1} is below the required {minimum:.1}")]
    HealthBelowThreshold { score: f64, minimum: f64 },

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ValidatorError {
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidatorError::ConfigurationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn probe(probe: impl Into<String>, message: impl Into<String>) -> Self {
        ValidatorError::ProbeFailed {
            probe: probe.into(),
            message: message.into(),
        }
    }
}
