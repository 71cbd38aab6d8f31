//! Satellite group coordination
//!
//! A [`SatelliteGroup`] starts one [`SatelliteHandle`] per configured port,
//! and fans every group-wide operation out over them strictly in port-set
//! order. There is no concurrency between satellites.

use std::sync::Arc;

use shared::logging::{log_shutdown, log_startup};
use shared::{PortSet, SatelliteMode, satellite_error};

use crate::config::GroupConfig;
use crate::error::{SatelliteError, SatelliteResult};
use crate::services::{HttpSpanCounter, SatelliteLogs};
use crate::supervisor::SatelliteHandle;
use crate::traits::SpanCounter;
use crate::types::{GroupSnapshot, PortCount};

/// Lifecycle of a group's satellites
pub enum GroupState<C> {
    /// Created without starting anything
    NotStarted,
    /// Every configured port has a handle, in port-set order
    Running(Vec<SatelliteHandle<C>>),
    /// Shut down; `start` may bring it back
    Stopped,
}

impl<C> GroupState<C> {
    pub fn name(&self) -> &'static str {
        match self {
            GroupState::NotStarted => "not started",
            GroupState::Running(_) => "running",
            GroupState::Stopped => "stopped",
        }
    }
}

pub struct SatelliteGroup<C = HttpSpanCounter> {
    config: GroupConfig,
    counter: Arc<C>,
    logs: SatelliteLogs,
    state: GroupState<C>,
}

impl SatelliteGroup<HttpSpanCounter> {
    /// Create an idle group that talks to satellites over HTTP
    pub fn new(config: GroupConfig) -> SatelliteResult<Self> {
        let counter = HttpSpanCounter::from_config(&config)?;
        Ok(SatelliteGroup::with_counter(config, Arc::new(counter)))
    }

    /// Start every satellite in `config` and wait for them to come up
    pub async fn launch(config: GroupConfig) -> SatelliteResult<Self> {
        let mut group = Self::new(config)?;
        group.start_configured().await?;
        Ok(group)
    }
}

impl<C: SpanCounter> SatelliteGroup<C> {
    /// Create an idle group with a custom counter source
    pub fn with_counter(config: GroupConfig, counter: Arc<C>) -> Self {
        let logs = SatelliteLogs::new(&config.project_dir);
        Self {
            config,
            counter,
            logs,
            state: GroupState::NotStarted,
        }
    }

    pub async fn launch_with_counter(config: GroupConfig, counter: Arc<C>) -> SatelliteResult<Self> {
        let mut group = Self::with_counter(config, counter);
        group.start_configured().await?;
        Ok(group)
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn logs(&self) -> &SatelliteLogs {
        &self.logs
    }

    pub fn state(&self) -> &GroupState<C> {
        &self.state
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, GroupState::Running(_))
    }

    /// Restart a not-started or stopped group under a new mode and port set
    pub async fn start(&mut self, mode: SatelliteMode, ports: PortSet) -> SatelliteResult<()> {
        if self.is_started() {
            return Err(SatelliteError::state(
                "Can't call start since satellites are already running",
            ));
        }

        self.config.mode = mode;
        self.config.ports = ports;
        self.start_configured().await
    }

    async fn start_configured(&mut self) -> SatelliteResult<()> {
        self.logs = SatelliteLogs::new(&self.config.project_dir);
        self.logs.ensure_logs_dir().await?;

        log_startup(self.config.mode.as_str(), &self.config.ports.to_string());

        // Handles spawned before a failure are dropped here, which kills them
        let mut handles = Vec::with_capacity(self.config.ports.len());
        for port in self.config.ports.iter() {
            let handle = SatelliteHandle::spawn(
                port,
                &self.config.mode,
                &self.config.command,
                &self.logs,
                Arc::clone(&self.counter),
            )
            .await?;
            handles.push(handle);
        }

        tokio::time::sleep(self.config.settle_delay).await;

        let dead: Vec<u16> = handles
            .iter_mut()
            .filter_map(|handle| (!handle.is_running()).then(|| handle.port()))
            .collect();

        if !dead.is_empty() {
            for &port in &dead {
                satellite_error!(port, "❌ Satellite exited during startup");
            }
            // Keep the evidence: shut the survivors down and persist everyone's logs
            if let Err(e) = self.terminate_and_collect(handles).await {
                tracing::warn!("⚠️ Cleanup after failed startup was incomplete: {}", e);
            }
            return Err(SatelliteError::StartupError { ports: dead });
        }

        tracing::info!(
            "✅ All {} satellites running in '{}' mode",
            handles.len(),
            self.config.mode
        );
        self.state = GroupState::Running(handles);
        Ok(())
    }

    fn handles_mut(&mut self) -> Option<&mut Vec<SatelliteHandle<C>>> {
        match &mut self.state {
            GroupState::Running(handles) => Some(handles),
            _ => None,
        }
    }

    /// True only if the group is running and no satellite has exited
    pub fn all_running(&mut self) -> bool {
        match self.handles_mut() {
            Some(handles) => handles.iter_mut().all(|handle| handle.is_running()),
            None => false,
        }
    }

    /// Handles, provided every satellite is still alive
    fn live_handles(&mut self, action: &str) -> SatelliteResult<&mut Vec<SatelliteHandle<C>>> {
        let not_running =
            || SatelliteError::aggregation(format!("Can't {action} since not all satellites are running"));

        if !self.all_running() {
            return Err(not_running());
        }
        self.handles_mut().ok_or_else(not_running)
    }

    /// Per-satellite counts, in port-set order
    pub async fn spans_received_by_port(&mut self) -> SatelliteResult<Vec<PortCount>> {
        let handles = self.live_handles("get spans received")?;

        let mut counts = Vec::with_capacity(handles.len());
        for handle in handles.iter() {
            counts.push(PortCount {
                port: handle.port(),
                spans_received: handle.spans_received().await?,
            });
        }
        Ok(counts)
    }

    /// Sum of every satellite's count; the first failing satellite fails the whole sum
    pub async fn spans_received(&mut self) -> SatelliteResult<i64> {
        let counts = self.spans_received_by_port().await?;
        total_of(&counts)
    }

    pub async fn reset_spans_received(&mut self) -> SatelliteResult<()> {
        if !self.is_started() {
            return Err(SatelliteError::state(
                "Can't reset spans received since no satellites are running",
            ));
        }

        let handles = self.live_handles("reset spans received")?;
        for handle in handles.iter_mut() {
            handle.reset_spans_received().await?;
        }
        Ok(())
    }

    /// Terminate every satellite and append their logs to the cumulative log.
    ///
    /// The group ends up stopped even when a satellite fails to terminate;
    /// the first such error is returned after every satellite was handled.
    pub async fn shutdown(&mut self) -> SatelliteResult<()> {
        let handles = match std::mem::replace(&mut self.state, GroupState::Stopped) {
            GroupState::Running(handles) => handles,
            other => {
                let message = format!(
                    "Can't call shutdown since there are no satellites running (group is {})",
                    other.name()
                );
                self.state = other;
                return Err(SatelliteError::state(message));
            }
        };

        log_shutdown("shutdown requested");
        self.terminate_and_collect(handles).await
    }

    async fn terminate_and_collect(&self, handles: Vec<SatelliteHandle<C>>) -> SatelliteResult<()> {
        let mut collected = Vec::with_capacity(handles.len());
        let mut first_error = None;

        for handle in handles {
            let port = handle.port();
            match handle.terminate(self.config.terminate_timeout).await {
                Ok(logs) => collected.push((port, logs)),
                Err(e) => {
                    satellite_error!(port, "❌ Failed to terminate satellite: {}", e);
                    collected.push((port, format!("<logs unavailable: {e}>\n")));
                    first_error.get_or_insert(e);
                }
            }
        }

        self.logs.append_group_logs(&collected).await?;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Current view of the group; counter failures are reported, not returned
    pub async fn snapshot(&mut self) -> GroupSnapshot {
        let running = self.all_running();
        let (per_port, error) = if running {
            match self.spans_received_by_port().await {
                Ok(counts) => (counts, None),
                Err(e) => (Vec::new(), Some(e.to_string())),
            }
        } else {
            (Vec::new(), None)
        };

        let (spans_received, error) = match (running, error) {
            (true, None) => match total_of(&per_port) {
                Ok(total) => (Some(total), None),
                Err(e) => (None, Some(e.to_string())),
            },
            (_, error) => (None, error),
        };

        GroupSnapshot {
            mode: self.config.mode.to_string(),
            ports: self.config.ports.as_slice().to_vec(),
            running,
            spans_received,
            per_port,
            error,
        }
    }
}

/// Sum of per-port counts; overflow is an error rather than a wrap
fn total_of(counts: &[PortCount]) -> SatelliteResult<i64> {
    counts.iter().try_fold(0i64, |total, count| {
        total.checked_add(count.spans_received).ok_or_else(|| {
            SatelliteError::aggregation(format!(
                "span total overflowed at satellite {}",
                count.port
            ))
        })
    })
}

impl<C> Drop for SatelliteGroup<C> {
    fn drop(&mut self) {
        if let GroupState::Running(handles) = &self.state {
            tracing::warn!(
                "🚨 Satellite group dropped without shutdown; killing {} satellites",
                handles.len()
            );
        }
    }
}
