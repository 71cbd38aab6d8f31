//! HTTP implementation of [`SpanCounter`]
//!
//! Issues `GET /spans_received` against a satellite and parses the decimal
//! body.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use crate::config::GroupConfig;
use crate::error::{SatelliteError, SatelliteResult};
use crate::traits::SpanCounter;

pub struct HttpSpanCounter {
    client: reqwest::Client,
    host: String,
}

impl HttpSpanCounter {
    /// Create a counter client; `timeout` of `None` leaves requests unbounded
    pub fn new(host: impl Into<String>, timeout: Option<Duration>) -> SatelliteResult<Self> {
        let host = host.into();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| SatelliteError::RequestError {
            url: host.clone(),
            source,
        })?;

        Ok(Self { client, host })
    }

    pub fn from_config(config: &GroupConfig) -> SatelliteResult<Self> {
        Self::new(config.host.clone(), config.request_timeout)
    }

    pub fn endpoint(&self, port: u16) -> String {
        format!("http://{}:{}/spans_received", self.host, port)
    }
}

#[async_trait]
impl SpanCounter for HttpSpanCounter {
    async fn spans_received(&self, port: u16) -> SatelliteResult<i64> {
        let url = self.endpoint(port);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| SatelliteError::RequestError {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SatelliteError::CommunicationError {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| SatelliteError::RequestError {
                url: url.clone(),
                source,
            })?;

        body.trim()
            .parse::<i64>()
            .map_err(|_| SatelliteError::ParseError { url, body })
    }
}
