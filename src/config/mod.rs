//! Configuration module
//!
//! Handles loading and layering executor settings.

pub mod env;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::utils::logger::LogLevel;
use env::EnvConfig;

/// Executor configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Timeout for each cluster API call, in seconds; none means unbounded
    pub request_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Indent JSON output
    pub pretty: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: None,
            log_level: "warn".to_string(),
            pretty: false,
        }
    }
}

impl ExecutorConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Self = if path
            .as_ref()
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Apply environment overrides on top of this configuration
    pub fn merge_env(mut self, env: &EnvConfig) -> Self {
        if let Some(timeout) = env.timeout {
            self.request_timeout_secs = Some(timeout);
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
        if let Some(pretty) = env.pretty {
            self.pretty = pretty;
        }
        self
    }

    /// Request timeout; zero disables it
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Parsed log level, `warn` when unrecognized
    pub fn log_level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or(LogLevel::WARN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.log_level(), LogLevel::WARN);
        assert!(!config.pretty);
    }

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "request_timeout_secs: 15\nlog_level: debug").unwrap();

        let config = ExecutorConfig::load(file.path()).unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.log_level(), LogLevel::DEBUG);
        assert!(!config.pretty);
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"pretty": true, "request_timeout_secs": 0}}"#).unwrap();

        let config = ExecutorConfig::load(file.path()).unwrap();
        assert!(config.pretty);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_env_overrides_file() {
        let env = EnvConfig {
            timeout: Some(3),
            log_level: Some("trace".to_string()),
            ..Default::default()
        };

        let config = ExecutorConfig::default().merge_env(&env);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.log_level(), LogLevel::TRACE);
    }
}
