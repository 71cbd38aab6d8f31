//! Group Configuration Builder
//!
//! Fluent builder for [`GroupConfig`]

use std::path::PathBuf;
use std::time::Duration;

use shared::{PortSet, SatelliteMode};

use super::group::{
    DEFAULT_HOST, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SETTLE_DELAY, DEFAULT_TERMINATE_TIMEOUT, GroupConfig,
    SatelliteCommand,
};

pub struct GroupConfigBuilder {
    mode: SatelliteMode,
    ports: PortSet,
    command: Option<SatelliteCommand>,
    project_dir: PathBuf,
    host: String,
    settle_delay: Duration,
    request_timeout: Option<Duration>,
    terminate_timeout: Option<Duration>,
}

impl GroupConfigBuilder {
    pub fn new() -> Self {
        Self {
            mode: SatelliteMode::default(),
            ports: PortSet::default(),
            command: None,
            project_dir: PathBuf::from("."),
            host: DEFAULT_HOST.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            terminate_timeout: Some(DEFAULT_TERMINATE_TIMEOUT),
        }
    }

    /// Set the mode forwarded to every satellite
    pub fn mode(mut self, mode: impl Into<SatelliteMode>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Set the ordered port set
    pub fn ports(mut self, ports: PortSet) -> Self {
        self.ports = ports;
        self
    }

    /// Set the satellite launch command (defaults to the python mock under the project dir)
    pub fn command(mut self, command: SatelliteCommand) -> Self {
        self.command = Some(command);
        self
    }

    /// Set the project directory that holds `logs/`
    pub fn project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn terminate_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.terminate_timeout = timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> GroupConfig {
        let command = self
            .command
            .unwrap_or_else(|| SatelliteCommand::python_mock(&self.project_dir));

        GroupConfig {
            mode: self.mode,
            ports: self.ports,
            command,
            project_dir: self.project_dir,
            host: self.host,
            settle_delay: self.settle_delay,
            request_timeout: self.request_timeout,
            terminate_timeout: self.terminate_timeout,
        }
    }
}

impl Default for GroupConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let ports = PortSet::new(vec![9001, 9002]).unwrap();
        let config = GroupConfigBuilder::new()
            .mode("slow")
            .ports(ports.clone())
            .project_dir("/tmp/project")
            .host("127.0.0.1")
            .settle_delay(Duration::from_millis(50))
            .request_timeout(None)
            .terminate_timeout(Some(Duration::from_secs(1)))
            .build();

        assert_eq!(config.mode.as_str(), "slow");
        assert_eq!(config.ports, ports);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.settle_delay, Duration::from_millis(50));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.terminate_timeout, Some(Duration::from_secs(1)));
    }

    #[cfg(unix)]
    #[test]
    fn test_default_command_follows_project_dir() {
        let config = GroupConfigBuilder::new().project_dir("/srv/harness").build();
        assert_eq!(
            config.command.args,
            vec!["/srv/harness/satellite/mock_satellite.py".to_string()]
        );
    }

    #[test]
    fn test_explicit_command_wins() {
        let config = GroupConfigBuilder::new()
            .project_dir("/srv/harness")
            .command(SatelliteCommand::new("mock-satellite", vec![]))
            .build();
        assert_eq!(config.command.program, "mock-satellite");
        assert!(config.command.args.is_empty());
    }
}
