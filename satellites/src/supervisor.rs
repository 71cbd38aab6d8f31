//! Single satellite supervision
//!
//! A [`SatelliteHandle`] owns exactly one mock satellite process, the file
//! capturing its output, and the baseline used to reset its counter without
//! talking to the process.

use std::sync::Arc;
use std::time::Duration;
use tokio::process::Child;

use crate::config::SatelliteCommand;
use crate::error::{SatelliteError, SatelliteResult};
use crate::services::SatelliteLogs;
use crate::services::launcher;
use crate::traits::SpanCounter;
use shared::{SatelliteMode, satellite_debug, satellite_info, satellite_warn};

pub struct SatelliteHandle<C> {
    port: u16,
    child: Child,
    /// Closed (taken) only by `terminate`
    log_sink: Option<std::fs::File>,
    /// Subtracted from the raw counter; only ever grows
    baseline: i64,
    counter: Arc<C>,
}

impl<C: SpanCounter> SatelliteHandle<C> {
    /// Open a fresh log capture for `port` and spawn the satellite into it.
    ///
    /// Succeeds as soon as the process is launched. A satellite that dies
    /// while binding its port is only detected by [`is_running`](Self::is_running).
    pub async fn spawn(
        port: u16,
        mode: &SatelliteMode,
        command: &SatelliteCommand,
        logs: &SatelliteLogs,
        counter: Arc<C>,
    ) -> SatelliteResult<Self> {
        let log_sink = logs.open_instance_sink(port).await?;
        let child = launcher::spawn_satellite(command, port, mode, &log_sink)?;

        Ok(Self {
            port,
            child,
            log_sink: Some(log_sink),
            baseline: 0,
            counter,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn baseline(&self) -> i64 {
        self.baseline
    }

    /// Swap the capture file, for exercising log read failures
    #[cfg(test)]
    pub(crate) fn replace_log_sink(&mut self, sink: std::fs::File) {
        self.log_sink = Some(sink);
    }

    /// Non-blocking liveness check
    pub fn is_running(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                satellite_debug!(self.port, "Satellite exited with {}", status);
                false
            }
            Err(e) => {
                satellite_warn!(self.port, "⚠️ Error checking satellite status: {}", e);
                false
            }
        }
    }

    /// Spans received since spawn or since the last reset
    pub async fn spans_received(&self) -> SatelliteResult<i64> {
        let raw = self.counter.spans_received(self.port).await?;
        raw.checked_sub(self.baseline).ok_or_else(|| {
            SatelliteError::aggregation(format!(
                "counter {} from satellite {} is out of range for baseline {}",
                raw, self.port, self.baseline
            ))
        })
    }

    /// Make the next [`spans_received`](Self::spans_received) return 0
    pub async fn reset_spans_received(&mut self) -> SatelliteResult<()> {
        let received = self.spans_received().await?;
        self.baseline = self.baseline.checked_add(received).ok_or_else(|| {
            SatelliteError::aggregation(format!(
                "baseline of satellite {} overflowed when adding {}",
                self.port, received
            ))
        })?;
        satellite_debug!(self.port, "Counter baseline moved to {}", self.baseline);
        Ok(())
    }

    /// Gracefully stop the satellite and return everything it logged.
    ///
    /// With a `grace` period the satellite is force killed once it elapses;
    /// with `None` this waits for as long as the satellite takes to exit.
    pub async fn terminate(mut self, grace: Option<Duration>) -> SatelliteResult<String> {
        launcher::request_termination(&mut self.child, self.port)?;

        let status = match grace {
            Some(grace) => match tokio::time::timeout(grace, self.child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    satellite_warn!(
                        self.port,
                        "🔨 Satellite ignored SIGTERM for {:?}, force killing",
                        grace
                    );
                    self.child.kill().await?;
                    self.child.wait().await?
                }
            },
            None => self.child.wait().await?,
        };
        satellite_info!(self.port, "🏁 Satellite exited with {}", status);

        let sink = self
            .log_sink
            .take()
            .ok_or_else(|| SatelliteError::state(format!("log for satellite {} already closed", self.port)))?;

        SatelliteLogs::read_sink(sink).await
    }
}

impl<C> Drop for SatelliteHandle<C> {
    fn drop(&mut self) {
        // Emergency cleanup for handles dropped without terminate()
        if let Ok(None) = self.child.try_wait() {
            satellite_warn!(self.port, "🚨 Emergency cleanup: force killing satellite");
            let _ = self.child.start_kill();
        }
    }
}
