//! Configuration Management
//!
//! Group configuration, its fluent builder, and environment loading.

pub mod builder;
pub mod group;

pub use builder::GroupConfigBuilder;
pub use group::{GroupConfig, SatelliteCommand};
