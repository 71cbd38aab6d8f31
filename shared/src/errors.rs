//! Shared error types for the mock satellite harness

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Invalid port '{input}': {reason}")]
    InvalidPort { input: String, reason: String },

    #[error("Duplicate port in port set: {port}")]
    DuplicatePort { port: u16 },
}

impl SharedError {
    pub fn invalid_config(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            value: value.into(),
        }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
