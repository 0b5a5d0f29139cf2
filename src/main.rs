//! kube-step - run one declarative test step against the Kubernetes API
//!
//! ## Usage
//!
//! ```bash
//! # Run a step file
//! kube-step run get-pods.yaml --pretty
//!
//! # Pipe a step in
//! echo '{"method":"version"}' | kube-step run
//!
//! # Validate a step without a cluster
//! kube-step check delete-pod.yaml
//!
//! # Print input/result schemas
//! kube-step schema
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::io::Read;
use tracing::{debug, info};

mod cli;

use cli::{Args, CheckArgs, Command, RunArgs};
use kube_step::config::env::{print_env_help, EnvConfig};
use kube_step::config::ExecutorConfig;
use kube_step::utils::logger::{init_logger, LogLevel};
use kube_step::{
    ExecutorError, InvocationResult, RequestDescriptor, StepExecutor, StepMethod, StepRecord,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();
    let config = load_config(&args, &env)?;

    let level = if args.verbose {
        LogLevel::DEBUG
    } else {
        args.log_level
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| config.log_level())
    };
    init_logger(level);

    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }

    match args.command {
        Command::Run(run_args) => run_step(run_args, config).await?,
        Command::Check(check_args) => check_step(check_args)?,
        Command::Schema => print_schemas()?,
        Command::Methods => list_methods(),
        Command::Env => print_env_help(),
    }

    Ok(())
}

/// File config, then environment, in increasing precedence
fn load_config(args: &Args, env: &EnvConfig) -> Result<ExecutorConfig> {
    let path = args.config.as_ref().or(env.config_file.as_ref());

    let config = match path {
        Some(path) => ExecutorConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => ExecutorConfig::default(),
    };

    Ok(config.merge_env(env))
}

async fn run_step(args: RunArgs, mut config: ExecutorConfig) -> Result<()> {
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = Some(timeout);
    }
    let pretty = args.pretty || config.pretty;

    let step = read_step(&args.step)?;
    let executor = StepExecutor::new().with_timeout(config.request_timeout());

    info!("Running {} step from {}", kube_step::NAME, args.step);

    match executor.run(&step).await {
        Ok(result) => {
            debug!("Step finished with code {:?}", result.code);
            print_json(&result, pretty)
        }
        Err(err) => {
            if args.report_errors {
                print_json(&failure_record(&err), pretty)?;
            }
            Err(err).with_context(|| format!("{} step failed", step_label(&args.step)))
        }
    }
}

/// Result record for a failed step, keeping the API status when there is one
fn failure_record(err: &ExecutorError) -> InvocationResult {
    InvocationResult {
        code: err.status_code(),
        ..InvocationResult::from_error(err)
    }
}

fn step_label(step: &str) -> String {
    if step == "-" {
        "stdin".to_string()
    } else {
        step.to_string()
    }
}

fn check_step(args: CheckArgs) -> Result<()> {
    let step = read_step(&args.step)?;
    let desc = RequestDescriptor::from_step(&step).context("Invalid step")?;

    desc.validate()?;

    print_json(&desc, true)
}

fn print_schemas() -> Result<()> {
    let step = schemars::schema_for!(StepRecord);
    let result = schemars::schema_for!(InvocationResult);

    println!("{}", serde_json::to_string_pretty(&step)?);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn list_methods() {
    println!("\nSupported methods:\n");
    for method in StepMethod::all() {
        println!("  {:8} {}", method.as_str(), method.description());
    }
    println!();
}

/// Read a step from a file or stdin. YAML is a superset of JSON, so one
/// parser covers both.
fn read_step(source: &str) -> Result<Value> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read step from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))?
    };

    serde_yaml::from_str(&content).context("Failed to parse step")
}

fn print_json(value: &impl serde::Serialize, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube_step::error::ApiError;
    use std::io::Write;

    #[test]
    fn test_read_step_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "method: get\nnamespace: default\nresource: pods\nlabelselector: app=web"
        )
        .unwrap();

        let step = read_step(file.path().to_str().unwrap()).unwrap();
        assert_eq!(step["method"], "get");
        assert_eq!(step["namespace"], "default");

        let desc = RequestDescriptor::from_step(&step).unwrap();
        assert_eq!(desc.method, StepMethod::Get);
        assert_eq!(desc.label_selector.as_deref(), Some("app=web"));
    }

    #[test]
    fn test_read_step_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"method": "version"}}"#).unwrap();

        let step = read_step(file.path().to_str().unwrap()).unwrap();
        assert_eq!(step["method"], "version");
    }

    #[test]
    fn test_read_step_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step.yaml");
        assert!(read_step(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_failure_record_keeps_status() {
        let err = ExecutorError::from(ApiError::Status {
            code: 500,
            message: "boom".to_string(),
        });
        let record = failure_record(&err);
        assert_eq!(record.code, Some(500));
        assert_eq!(
            record.systemerr.as_deref(),
            Some("cluster API returned status 500: boom")
        );
        assert!(record.bodyjson.is_none());

        let record = failure_record(&ExecutorError::Validation("bad".to_string()));
        assert_eq!(record.code, None);
        assert_eq!(record.systemerr.as_deref(), Some("invalid request: bad"));
    }
}
