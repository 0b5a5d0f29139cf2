//! Logging setup for the binary
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to whoever runs it.

use std::fmt;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Verbosity of the `kube_step` log target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevel(Level);

impl LogLevel {
    pub const TRACE: LogLevel = LogLevel(Level::TRACE);
    pub const DEBUG: LogLevel = LogLevel(Level::DEBUG);
    pub const INFO: LogLevel = LogLevel(Level::INFO);
    pub const WARN: LogLevel = LogLevel(Level::WARN);
    pub const ERROR: LogLevel = LogLevel(Level::ERROR);
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" => Ok(LogLevel::WARN),
            other => other
                .parse::<Level>()
                .map(LogLevel)
                .map_err(|_| format!("unknown log level: {s}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.as_str().to_lowercase())
    }
}

/// Install a compact stderr subscriber; stdout carries the step result.
///
/// `RUST_LOG` directives are added on top of the `kube_step=<level>` default.
pub fn init_logger(level: LogLevel) {
    let mut filter = EnvFilter::new(format!("kube_step={level}"));
    if let Ok(extra) = std::env::var(EnvFilter::DEFAULT_ENV) {
        for directive in extra.split(',').filter_map(|d| d.parse().ok()) {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!("info".parse(), Ok(LogLevel::INFO));
        assert_eq!("DEBUG".parse(), Ok(LogLevel::DEBUG));
        assert_eq!("warning".parse(), Ok(LogLevel::WARN));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_display_feeds_filter() {
        assert_eq!(LogLevel::TRACE.to_string(), "trace");
        assert_eq!(format!("kube_step={}", LogLevel::ERROR), "kube_step=error");
    }
}
