//! Service implementations
//!
//! Real implementations of the I/O the harness performs: HTTP counter
//! queries, child process launch and signalling, and log files.

pub mod launcher;
pub mod log_store;
pub mod span_counter;

#[cfg(test)]
mod tests;

pub use log_store::SatelliteLogs;
pub use span_counter::HttpSpanCounter;
