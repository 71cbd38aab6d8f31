//! Shared logging utilities for consistent tracing across the harness

use chrono::{DateTime, Utc};
use tracing::info;

/// Default filter used when `RUST_LOG` is not set
pub fn default_filter(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("satellites={base_level},shared={base_level},reqwest=warn,hyper=warn")
}

/// Initialize the stdout tracing subscriber.
///
/// `RUST_LOG` wins over `log_level` when it is set. Safe to call more than
/// once; later calls are ignored.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for port-aware info logging
#[macro_export]
macro_rules! satellite_info {
    ($port:expr, $($arg:tt)*) => {
        tracing::info!(
            port = $port,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for port-aware warning logging
#[macro_export]
macro_rules! satellite_warn {
    ($port:expr, $($arg:tt)*) => {
        tracing::warn!(
            port = $port,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for port-aware error logging
#[macro_export]
macro_rules! satellite_error {
    ($port:expr, $($arg:tt)*) => {
        tracing::error!(
            port = $port,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for port-aware debug logging
#[macro_export]
macro_rules! satellite_debug {
    ($port:expr, $($arg:tt)*) => {
        tracing::debug!(
            port = $port,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for group startup
pub fn log_startup(mode: &str, ports: &str) {
    info!(
        timestamp = format_timestamp(),
        "🚀 Starting satellite group in '{}' mode on ports {}",
        mode,
        ports
    );
}

/// Contextual logging helper for group shutdown
pub fn log_shutdown(reason: &str) {
    info!(
        timestamp = format_timestamp(),
        "🛑 Shutting down satellite group: {}",
        reason
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_level() {
        assert_eq!(
            default_filter(Some("debug")),
            "satellites=debug,shared=debug,reqwest=warn,hyper=warn"
        );
        assert!(default_filter(None).starts_with("satellites=info"));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = format_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(ts.len(), 12);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[8..9], ".");
    }

    #[test]
    fn test_macros_expand_without_subscriber() {
        satellite_info!(9001u16, "info from {}", "test");
        satellite_warn!(9001u16, "warn");
        satellite_error!(9001u16, "error");
        satellite_debug!(9001u16, "debug");
        init_tracing(Some("debug"));
        init_tracing(Some("info"));
    }
}
