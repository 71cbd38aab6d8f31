//! Serializable views of a satellite group

use serde::{Deserialize, Serialize};

/// Counter reading for one satellite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortCount {
    pub port: u16,
    pub spans_received: i64,
}

/// Point-in-time view of a group, printed by the CLI with `--json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub mode: String,
    pub ports: Vec<u16>,
    pub running: bool,
    /// Aggregate count, absent when it could not be read
    pub spans_received: Option<i64>,
    pub per_port: Vec<PortCount>,
    pub error: Option<String>,
}
