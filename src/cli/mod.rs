//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Kubernetes test-step executor
#[derive(Parser, Debug)]
#[command(name = "kube-step")]
#[command(version)]
#[command(about = "Run one declarative step against the Kubernetes API")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a step and print its result
    Run(RunArgs),

    /// Validate a step without contacting a cluster
    Check(CheckArgs),

    /// Print the JSON schema of step input and result
    Schema,

    /// List supported methods
    Methods,

    /// Show environment variables
    Env,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Step file (YAML or JSON), `-` for stdin
    #[arg(default_value = "-")]
    pub step: String,

    /// Indent JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Cluster API request timeout in seconds (0 disables it)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Print failures as a result record with `systemerr` set
    #[arg(long)]
    pub report_errors: bool,
}

/// Arguments for check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Step file (YAML or JSON), `-` for stdin
    #[arg(default_value = "-")]
    pub step: String,
}
