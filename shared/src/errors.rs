//! Shared error types for the orchestration and validation services

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Unknown hardware class: {input}")]
    UnknownHardwareClass { input: String },

    #[error("Unknown agent state: {input}")]
    UnknownAgentState { input: String },

    #[error("Malformed agent declaration '{input}': expected name:HW:port")]
    MalformedAgentSpec { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
