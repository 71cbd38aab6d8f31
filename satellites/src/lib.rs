//! Mock satellite fleet harness
//!
//! Starts a group of mock satellite processes on local ports, checks they
//! stay alive, aggregates the `spans_received` counter each one reports,
//! and shuts them down while collecting their logs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use satellites::{GroupConfig, SatelliteGroup};
//! use shared::PortSet;
//!
//! # async fn run() -> satellites::SatelliteResult<()> {
//! let config = GroupConfig::builder()
//!     .mode("default")
//!     .ports(PortSet::new(vec![9001, 9002])?)
//!     .build();
//!
//! let mut group = SatelliteGroup::launch(config).await?;
//! assert_eq!(group.spans_received().await?, 0);
//!
//! // ... drive traffic at the satellites ...
//!
//! group.reset_spans_received().await?;
//! group.shutdown().await?;
//! assert!(!group.all_running());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod group;
pub mod services;
pub mod supervisor;
pub mod traits;
pub mod types;

// Main interfaces
pub use config::{GroupConfig, GroupConfigBuilder, SatelliteCommand};
pub use error::{SatelliteError, SatelliteResult};
pub use group::{GroupState, SatelliteGroup};
pub use supervisor::SatelliteHandle;

// Supporting types
pub use services::{HttpSpanCounter, SatelliteLogs};
pub use traits::{MockSpanCounter, SpanCounter};
pub use types::{GroupSnapshot, PortCount};
