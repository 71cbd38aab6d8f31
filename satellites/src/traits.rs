//! Trait definitions with mockall annotations for testing
//!
//! The counter query is the seam between the group logic and the network.
//! Tests swap the HTTP implementation for `MockSpanCounter`.

use crate::error::SatelliteResult;

/// Source of the raw `spans_received` counter reported by a satellite
#[mockall::automock]
#[async_trait::async_trait]
pub trait SpanCounter: Send + Sync {
    /// Raw counter for the satellite listening on `port`.
    ///
    /// The value is whatever the satellite reports; baselines are applied by
    /// the caller.
    async fn spans_received(&self, port: u16) -> SatelliteResult<i64>;
}
