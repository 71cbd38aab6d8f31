//! Core shared types: satellite mode and port sets

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::errors::{SharedError, SharedResult};

/// Ports used when a group is started without an explicit port set
pub const DEFAULT_PORT_RANGE: Range<u16> = 8360..8368;

/// Mode passed verbatim to every mock satellite on its command line
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SatelliteMode(String);

impl SatelliteMode {
    pub fn new(mode: impl Into<String>) -> Self {
        Self(mode.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SatelliteMode {
    fn default() -> Self {
        Self::new("default")
    }
}

impl fmt::Display for SatelliteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SatelliteMode {
    fn from(mode: &str) -> Self {
        Self::new(mode)
    }
}

impl From<String> for SatelliteMode {
    fn from(mode: String) -> Self {
        Self(mode)
    }
}

impl FromStr for SatelliteMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Ordered, duplicate-free, non-empty list of satellite ports.
///
/// Order matters: every group-wide operation fans out in this order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u16>", into = "Vec<u16>")]
pub struct PortSet(Vec<u16>);

impl PortSet {
    pub fn new(ports: Vec<u16>) -> SharedResult<Self> {
        if ports.is_empty() {
            return Err(SharedError::invalid_config("ports", "<empty>"));
        }

        let mut seen = HashSet::with_capacity(ports.len());
        for &port in &ports {
            if port == 0 {
                return Err(SharedError::InvalidPort {
                    input: "0".to_string(),
                    reason: "satellites need a fixed port".to_string(),
                });
            }
            if !seen.insert(port) {
                return Err(SharedError::DuplicatePort { port });
            }
        }

        Ok(Self(ports))
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn parse_port(input: &str) -> SharedResult<u16> {
        input.trim().parse::<u16>().map_err(|e| SharedError::InvalidPort {
            input: input.trim().to_string(),
            reason: e.to_string(),
        })
    }

    fn from_range(start: u16, end: u16, original: &str) -> SharedResult<Self> {
        if end <= start {
            return Err(SharedError::invalid_config("ports", original));
        }
        Self::new((start..end).collect())
    }
}

impl Default for PortSet {
    fn default() -> Self {
        Self(DEFAULT_PORT_RANGE.collect())
    }
}

impl TryFrom<Vec<u16>> for PortSet {
    type Error = SharedError;

    fn try_from(ports: Vec<u16>) -> Result<Self, Self::Error> {
        Self::new(ports)
    }
}

impl From<PortSet> for Vec<u16> {
    fn from(ports: PortSet) -> Self {
        ports.0
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ports = self.0.iter().map(u16::to_string).collect::<Vec<_>>().join(",");
        f.write_str(&ports)
    }
}

/// Accepts `8360-8367` (inclusive), `8360..8368` (half-open),
/// `9001,9002` (explicit list) or a single port.
impl FromStr for PortSet {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.contains(',') {
            let ports = trimmed
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(Self::parse_port)
                .collect::<SharedResult<Vec<_>>>()?;
            return Self::new(ports);
        }

        if let Some((start, end)) = trimmed.split_once("..") {
            return Self::from_range(Self::parse_port(start)?, Self::parse_port(end)?, trimmed);
        }

        if let Some((start, end)) = trimmed.split_once('-') {
            let end = Self::parse_port(end)?;
            let end = end
                .checked_add(1)
                .ok_or_else(|| SharedError::invalid_config("ports", trimmed))?;
            return Self::from_range(Self::parse_port(start)?, end, trimmed);
        }

        if trimmed.is_empty() {
            return Err(SharedError::invalid_config("ports", "<empty>"));
        }

        Self::new(vec![Self::parse_port(trimmed)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_set_is_eight_contiguous_ports() {
        let ports = PortSet::default();
        assert_eq!(ports.len(), 8);
        assert_eq!(ports.as_slice().first(), Some(&8360));
        assert_eq!(ports.as_slice().last(), Some(&8367));
    }

    #[test]
    fn test_parse_inclusive_range() {
        let ports: PortSet = "8360-8363".parse().unwrap();
        assert_eq!(ports.as_slice(), &[8360, 8361, 8362, 8363]);
    }

    #[test]
    fn test_parse_half_open_range() {
        let ports: PortSet = "8360..8368".parse().unwrap();
        assert_eq!(ports, PortSet::default());
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let ports: PortSet = "9002, 9001,9005".parse().unwrap();
        assert_eq!(ports.as_slice(), &[9002, 9001, 9005]);
        assert_eq!(ports.to_string(), "9002,9001,9005");
    }

    #[test]
    fn test_parse_single_port() {
        let ports: PortSet = "9001".parse().unwrap();
        assert_eq!(ports.as_slice(), &[9001]);
    }

    #[test]
    fn test_rejects_duplicates_and_empty_sets() {
        assert_eq!(
            "9001,9001".parse::<PortSet>(),
            Err(SharedError::DuplicatePort { port: 9001 })
        );
        assert!("".parse::<PortSet>().is_err());
        assert!(PortSet::new(vec![]).is_err());
        assert!("9005-9001".parse::<PortSet>().is_err());
    }

    #[test]
    fn test_rejects_garbage_and_port_zero() {
        assert!(matches!(
            "90a1".parse::<PortSet>(),
            Err(SharedError::InvalidPort { .. })
        ));
        assert!(matches!(
            PortSet::new(vec![0, 9001]),
            Err(SharedError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_port_set_serde_round_trip_validates() {
        let ports: PortSet = serde_json::from_str("[9001, 9002]").unwrap();
        assert_eq!(ports.as_slice(), &[9001, 9002]);
        assert!(serde_json::from_str::<PortSet>("[9001, 9001]").is_err());
    }

    #[test]
    fn test_mode_display_is_verbatim() {
        let mode = SatelliteMode::from("rejects_all");
        assert_eq!(mode.to_string(), "rejects_all");
        assert_eq!(SatelliteMode::default().as_str(), "default");
    }
}
