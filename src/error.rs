//! Error types
//!
//! Every failure of a step invocation is one of these. Nothing here is
//! retried; the host decides what to do with the error.

use std::time::Duration;

use kube::config::{InferConfigError, KubeconfigError};
use thiserror::Error;

/// Result alias for executor operations
pub type Result<T, E = ExecutorError> = std::result::Result<T, E>;

/// Top-level error of a single step invocation
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("invalid step: {0}")]
    Decoding(#[from] DecodingError),

    #[error("cluster client configuration failed: {0}")]
    Configuration(#[from] ConfigError),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("method not supported: {0:?}")]
    UnsupportedMethod(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("result not valid JSON: {0}")]
    ResultFormat(#[source] serde_json::Error),
}

impl ExecutorError {
    /// Short machine-readable kind, used in logs and CLI exit reporting
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutorError::Decoding(_) => "decoding",
            ExecutorError::Configuration(_) => "configuration",
            ExecutorError::Validation(_) => "validation",
            ExecutorError::UnsupportedMethod(_) => "unsupported_method",
            ExecutorError::Api(_) => "api",
            ExecutorError::ResultFormat(_) => "result_format",
        }
    }

    /// HTTP status reported by the API, if the failure carried one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ExecutorError::Api(err) => err.status_code(),
            _ => None,
        }
    }
}

/// The step record does not have the expected shape
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodingError {
    #[error("step must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("field `{field}` must be a {expected}, found {found}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Loading the kubeconfig or building the client failed
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load kubeconfig {path}: {source}")]
    Kubeconfig {
        path: String,
        #[source]
        source: KubeconfigError,
    },

    #[error(transparent)]
    Infer(#[from] InferConfigError),

    #[error("failed to create Kubernetes client: {0}")]
    Client(#[from] kube::Error),
}

/// The cluster API call failed
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request to cluster API failed: {0}")]
    Transport(#[source] kube::Error),

    #[error("cluster API returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("cluster API request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),
}

impl ApiError {
    /// HTTP status reported by the API, if the failure carried one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
