//! Tests for SatelliteLogs file layout and the cumulative log format

use std::io::Write;
use tempfile::TempDir;
use tokio::fs;

use crate::services::log_store::{GROUP_DELIMITER, SatelliteLogs};

#[cfg(unix)]
#[test]
fn test_paths_follow_layout() {
    let logs = SatelliteLogs::new(std::path::Path::new("/project"));

    assert_eq!(logs.logs_dir(), std::path::Path::new("/project/logs"));
    assert_eq!(
        logs.instance_log_path(8360),
        std::path::Path::new("/project/logs/temp/mock_satellite_8360.log")
    );
    assert_eq!(
        logs.cumulative_log_path(),
        std::path::Path::new("/project/logs/mock_satellites.log")
    );
}

#[test]
fn test_format_group_logs() {
    let block = SatelliteLogs::format_group_logs(&[
        (9001, "listening\n".to_string()),
        (9002, "listening\nbye\n".to_string()),
    ]);

    assert_eq!(
        block,
        "**********\n\
         *** logs from satellite 9001 ***\n\
         listening\n\
         *** logs from satellite 9002 ***\n\
         listening\nbye\n\
         \n"
    );
}

#[tokio::test]
async fn test_ensure_logs_dir_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let logs = SatelliteLogs::new(dir.path());

    logs.ensure_logs_dir().await.unwrap();
    logs.ensure_logs_dir().await.unwrap();
    assert!(logs.logs_dir().is_dir());
}

#[tokio::test]
async fn test_instance_sink_is_truncated_and_read_from_start() {
    let dir = TempDir::new().unwrap();
    let logs = SatelliteLogs::new(dir.path());

    let mut sink = logs.open_instance_sink(9001).await.unwrap();
    sink.write_all(b"old run\n").unwrap();
    drop(sink);

    let mut sink = logs.open_instance_sink(9001).await.unwrap();
    sink.write_all(b"new run\n").unwrap();

    let captured = SatelliteLogs::read_sink(sink).await.unwrap();
    assert_eq!(captured, "new run\n");
}

#[tokio::test]
async fn test_cumulative_log_is_appended_not_truncated() {
    let dir = TempDir::new().unwrap();
    let logs = SatelliteLogs::new(dir.path());

    logs.append_group_logs(&[(9001, "first\n".to_string())]).await.unwrap();
    logs.append_group_logs(&[(9001, "second\n".to_string())]).await.unwrap();

    let content = fs::read_to_string(logs.cumulative_log_path()).await.unwrap();
    assert_eq!(content.matches(GROUP_DELIMITER).count(), 2);
    let first = content.find("first").unwrap();
    let second = content.find("second").unwrap();
    assert!(first < second);
}
