//! Satellite log files
//!
//! Layout under the project directory:
//! - `logs/temp/mock_satellite_<port>.log`: live capture of one satellite,
//!   truncated every time that satellite is spawned
//! - `logs/mock_satellites.log`: cumulative, appended on every group shutdown

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::error::SatelliteResult;

pub const CUMULATIVE_LOG_FILE: &str = "mock_satellites.log";
pub const GROUP_DELIMITER: &str = "**********";

#[derive(Debug, Clone)]
pub struct SatelliteLogs {
    logs_dir: PathBuf,
}

impl SatelliteLogs {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            logs_dir: project_dir.join("logs"),
        }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.logs_dir.join("temp")
    }

    pub fn instance_log_path(&self, port: u16) -> PathBuf {
        self.temp_dir().join(format!("mock_satellite_{port}.log"))
    }

    pub fn cumulative_log_path(&self) -> PathBuf {
        self.logs_dir.join(CUMULATIVE_LOG_FILE)
    }

    /// Create `logs/` if it does not exist yet
    pub async fn ensure_logs_dir(&self) -> SatelliteResult<()> {
        fs::create_dir_all(&self.logs_dir).await?;
        Ok(())
    }

    /// Open a fresh capture file for `port`, truncating any previous run.
    ///
    /// Returned as a std file so it can be handed to the child's stdio.
    pub async fn open_instance_sink(&self, port: u16) -> SatelliteResult<std::fs::File> {
        fs::create_dir_all(self.temp_dir()).await?;

        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.instance_log_path(port))
            .await?;

        Ok(file.into_std().await)
    }

    /// Read everything captured in `sink` from the start, then close it
    pub async fn read_sink(sink: std::fs::File) -> SatelliteResult<String> {
        let mut file = fs::File::from_std(sink);
        file.seek(SeekFrom::Start(0)).await?;

        let mut captured = Vec::new();
        file.read_to_end(&mut captured).await?;

        Ok(String::from_utf8_lossy(&captured).into_owned())
    }

    /// Render one shutdown's worth of logs in the cumulative file format
    pub fn format_group_logs(logs: &[(u16, String)]) -> String {
        let mut block = format!("{GROUP_DELIMITER}\n");
        for (port, text) in logs {
            block.push_str(&format!("*** logs from satellite {port} ***\n"));
            block.push_str(text);
        }
        block.push('\n');
        block
    }

    /// Append one shutdown block to the cumulative log
    pub async fn append_group_logs(&self, logs: &[(u16, String)]) -> SatelliteResult<()> {
        fs::create_dir_all(&self.logs_dir).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.cumulative_log_path())
            .await?;

        file.write_all(Self::format_group_logs(logs).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
