//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "KUBE_STEP";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Request timeout from KUBE_STEP_TIMEOUT
    pub timeout: Option<u64>,
    /// Log level from KUBE_STEP_LOG
    pub log_level: Option<String>,
    /// Config file from KUBE_STEP_CONFIG
    pub config_file: Option<String>,
    /// Pretty output from KUBE_STEP_PRETTY
    pub pretty: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            timeout: get_env_parse("TIMEOUT"),
            log_level: get_env("LOG"),
            config_file: get_env("CONFIG"),
            pretty: get_env_bool("PRETTY"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.timeout.is_some()
            || self.log_level.is_some()
            || self.config_file.is_some()
            || self.pretty.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Print the environment variables the executor reads
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_TIMEOUT   Cluster API request timeout in seconds");
    println!("  {ENV_PREFIX}_LOG       Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_CONFIG    Path to configuration file");
    println!("  {ENV_PREFIX}_PRETTY    Indent JSON output (true/false)");
    println!("  KUBECONFIG          Used only when no home directory can be found");
}
