use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub log_level: LogLevel,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: LogLevel::Info,
        }
    }
}

/// Log levels matching tracing's levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Performance tracking for operations
pub struct PerformanceTracker {
    start_time: Instant,
    operation_name: String,
}

impl PerformanceTracker {
    pub fn new(operation_name: &str) -> Self {
        Self {
            start_time: Instant::now(),
            operation_name: operation_name.to_string(),
        }
    }
}

impl Drop for PerformanceTracker {
    fn drop(&mut self) {
        let duration = self.start_time.elapsed();
        debug!(
            operation = %self.operation_name,
            duration_us = %duration.as_micros(),
            "Operation completed"
        );
    }
}

/// Install the global subscriber. Logs go to stderr so they never mix with the form.
///
/// `RUST_LOG`, when set, wins over the configured level. Returns `false` if a
/// subscriber was already installed or telemetry is disabled.
pub fn init(config: &TelemetryConfig) -> bool {
    if !config.enabled {
        return false;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("info", LogLevel::Info)]
    #[test_case("WARNING", LogLevel::Warn)]
    #[test_case(" trace ", LogLevel::Trace)]
    fn test_log_level_parsing(input: &str, expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>(), Ok(expected));
    }

    #[test]
    fn test_unknown_log_level() {
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_disabled_telemetry_installs_nothing() {
        let config = TelemetryConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(!init(&config));
    }
}
