//! Shared types for the mock satellite harness
//!
//! Holds the pieces every crate in the workspace agrees on: the mode
//! forwarded to satellites, port-set parsing, and the logging setup.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
