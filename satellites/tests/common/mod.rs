//! Common test utilities and infrastructure
//!
//! In-process mock satellites plus helpers that point a group at them.

pub mod fixtures;
pub mod helpers;

pub use fixtures::{MockFleet, MockSatellite};
pub use helpers::TestHelpers;
