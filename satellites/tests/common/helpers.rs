//! Test helpers for building groups against mock satellites

use std::path::Path;
use std::time::Duration;

use satellites::{GroupConfig, SatelliteCommand};
use shared::PortSet;

pub struct TestHelpers;

impl TestHelpers {
    /// Stand-in satellite process: logs its arguments, then idles until SIGTERM.
    ///
    /// The HTTP side is served by the in-process fixtures on the same port.
    pub fn idle_satellite() -> SatelliteCommand {
        SatelliteCommand::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo \"mock satellite on $1 ($2)\"; exec sleep 60".to_string(),
                "mock-satellite".to_string(),
            ],
        )
    }

    pub fn config(project_dir: &Path, mode: &str, ports: PortSet) -> GroupConfig {
        GroupConfig::builder()
            .mode(mode)
            .ports(ports)
            .command(Self::idle_satellite())
            .project_dir(project_dir)
            .host("127.0.0.1")
            .settle_delay(Duration::from_millis(200))
            .request_timeout(Some(Duration::from_secs(2)))
            .terminate_timeout(Some(Duration::from_secs(5)))
            .build()
    }
}
