//! Child process launch and termination for mock satellites

use std::process::Stdio;
use tokio::process::{Child, Command};

use crate::config::SatelliteCommand;
use crate::error::{SatelliteError, SatelliteResult};
use shared::{SatelliteMode, satellite_debug};

/// Spawn one satellite with stdout and stderr both writing into `sink`
pub fn spawn_satellite(
    command: &SatelliteCommand,
    port: u16,
    mode: &SatelliteMode,
    sink: &std::fs::File,
) -> SatelliteResult<Child> {
    let stdout = sink.try_clone()?;
    let stderr = sink.try_clone()?;

    let mut cmd = Command::new(&command.program);
    cmd.args(command.args_for(port, mode))
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));

    let child = cmd
        .spawn()
        .map_err(|source| SatelliteError::SpawnError { port, source })?;

    satellite_debug!(
        port,
        "🛰️ Spawned satellite (PID: {:?}) with `{} {}`",
        child.id(),
        command.program,
        command.args_for(port, mode).join(" ")
    );

    Ok(child)
}

/// Ask the satellite to exit: SIGTERM on unix, TerminateProcess elsewhere
#[cfg(unix)]
pub fn request_termination(child: &mut Child, port: u16) -> SatelliteResult<()> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    // Already reaped
    let Some(pid) = child.id() else {
        return Ok(());
    };

    match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) => {
            satellite_debug!(port, "📤 Sent SIGTERM to satellite {}", pid);
            Ok(())
        }
        Err(nix::errno::Errno::ESRCH) => Ok(()),
        Err(e) => Err(SatelliteError::SignalError {
            port,
            message: e.to_string(),
        }),
    }
}

#[cfg(not(unix))]
pub fn request_termination(child: &mut Child, port: u16) -> SatelliteResult<()> {
    child.start_kill().map_err(|e| SatelliteError::SignalError {
        port,
        message: e.to_string(),
    })
}
