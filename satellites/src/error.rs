//! Satellite harness error types

use thiserror::Error;
use shared::SharedError;

#[derive(Error, Debug)]
pub enum SatelliteError {
    #[error("Couldn't start all satellites (not running: {ports:?})")]
    StartupError { ports: Vec<u16> },

    #[error("Invalid group state: {message}")]
    StateError { message: String },

    #[error("Can't aggregate spans: {message}")]
    AggregationError { message: String },

    #[error("Bad status code {status} -- not able to GET /spans_received from {url}")]
    CommunicationError { url: String, status: u16 },

    #[error("Bad response -- expected an integer from {url}, got {body:?}")]
    ParseError { url: String, body: String },

    #[error("Request to {url} failed: {source}")]
    RequestError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to spawn satellite on port {port}: {source}")]
    SpawnError {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to signal satellite on port {port}: {message}")]
    SignalError { port: u16, message: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SatelliteError {
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError { message: message.into() }
    }

    pub fn aggregation(message: impl Into<String>) -> Self {
        Self::AggregationError { message: message.into() }
    }

    pub fn config(field: impl Into<String>) -> Self {
        Self::ConfigurationError { field: field.into() }
    }
}

pub type SatelliteResult<T> = Result<T, SatelliteError>;
