//! Satellite group configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use shared::{PortSet, SatelliteMode};

use super::builder::GroupConfigBuilder;
use crate::error::{SatelliteError, SatelliteResult};

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_TERMINATE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HOST: &str = "localhost";

/// Program and leading arguments used to launch one mock satellite.
///
/// The port and mode are appended as the final two positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatelliteCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SatelliteCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The python mock shipped alongside the project
    pub fn python_mock(project_dir: &Path) -> Self {
        let script = project_dir.join("satellite").join("mock_satellite.py");
        Self::new("python3", vec![script.to_string_lossy().into_owned()])
    }

    /// Split a whitespace separated command line
    pub fn parse(command_line: &str) -> SatelliteResult<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| SatelliteError::config("satellite command is empty"))?;
        Ok(Self::new(program, parts.collect()))
    }

    /// Full argument vector for a satellite on `port` running in `mode`
    pub fn args_for(&self, port: u16, mode: &SatelliteMode) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(port.to_string());
        args.push(mode.to_string());
        args
    }
}

/// Configuration for one satellite group
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Mode forwarded to every satellite
    pub mode: SatelliteMode,
    /// Ports to start satellites on, in fan-out order
    pub ports: PortSet,
    pub command: SatelliteCommand,
    /// Root under which `logs/` is created
    pub project_dir: PathBuf,
    /// Host used to reach `/spans_received`
    pub host: String,
    /// How long satellites get to bind before the liveness check
    pub settle_delay: Duration,
    /// HTTP timeout per counter request; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Grace period after SIGTERM before force killing; `None` waits indefinitely
    pub terminate_timeout: Option<Duration>,
}

impl GroupConfig {
    pub fn builder() -> GroupConfigBuilder {
        GroupConfigBuilder::new()
    }

    /// Builder seeded from `SATELLITE_*` environment variables (and `.env`)
    pub fn builder_from_env() -> SatelliteResult<GroupConfigBuilder> {
        let _ = dotenv::dotenv();

        let mut builder = GroupConfigBuilder::new();

        if let Some(mode) = env_var("SATELLITE_MODE") {
            builder = builder.mode(mode.as_str());
        }
        if let Some(ports) = env_var("SATELLITE_PORTS") {
            builder = builder.ports(ports.parse::<PortSet>()?);
        }
        if let Some(command) = env_var("SATELLITE_COMMAND") {
            builder = builder.command(SatelliteCommand::parse(&command)?);
        }
        if let Some(dir) = env_var("SATELLITE_PROJECT_DIR") {
            builder = builder.project_dir(dir);
        }
        if let Some(host) = env_var("SATELLITE_HOST") {
            builder = builder.host(host);
        }
        if let Some(delay) = env_var("SATELLITE_SETTLE_DELAY_MS") {
            let delay = parse_millis("SATELLITE_SETTLE_DELAY_MS", &delay)?
                .ok_or_else(|| SatelliteError::config("SATELLITE_SETTLE_DELAY_MS cannot be 'none'"))?;
            builder = builder.settle_delay(delay);
        }
        if let Some(timeout) = env_var("SATELLITE_REQUEST_TIMEOUT_MS") {
            builder = builder.request_timeout(parse_millis("SATELLITE_REQUEST_TIMEOUT_MS", &timeout)?);
        }
        if let Some(timeout) = env_var("SATELLITE_TERMINATE_TIMEOUT_MS") {
            builder = builder.terminate_timeout(parse_millis("SATELLITE_TERMINATE_TIMEOUT_MS", &timeout)?);
        }

        Ok(builder)
    }

    pub fn from_env() -> SatelliteResult<Self> {
        Ok(Self::builder_from_env()?.build())
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        GroupConfigBuilder::new().build()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Milliseconds, or `none` for an unbounded wait
pub(crate) fn parse_millis(field: &str, value: &str) -> SatelliteResult<Option<Duration>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|e| SatelliteError::config(format!("{field}={value}: {e}")))
}
