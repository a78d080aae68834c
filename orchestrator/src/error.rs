//! Orchestrator-specific error types

use shared::SharedError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Configuration error: {field}: {reason}")]
    ConfigurationError { field: String, reason: String },

    #[error("Routing for {task_type} references unknown capability: {capability}")]
    UnknownCapability { task_type: String, capability: String },

    #[error("Capability already registered: {name}")]
    DuplicateCapability { name: String },

    #[error("Capability {name} timed out after {timeout:?}")]
    CapabilityTimeout { name: String, timeout: Duration },

    #[error("Capability {name} failed: {message}")]
    CapabilityFailed { name: String, message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl OrchestratorError {
    /// Shorthand for configuration failures detected at startup
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        OrchestratorError::ConfigurationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
