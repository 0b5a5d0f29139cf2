//! Invocation result model
//!
//! The uniform shape every step produces, whatever the method.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Result of one step invocation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvocationResult {
    /// HTTP status reported by the API; absent for `version`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,

    /// Response body decoded as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodyjson: Option<Value>,

    /// Failure message, set by whoever reports a failed invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systemerr: Option<String>,
}

impl InvocationResult {
    /// Create a result from a status code and decoded body
    pub fn new(code: Option<u16>, bodyjson: Option<Value>) -> Self {
        Self {
            code,
            bodyjson,
            systemerr: None,
        }
    }

    /// Record for a failed invocation, as a host would report it
    pub fn from_error(err: &impl fmt::Display) -> Self {
        Self {
            code: None,
            bodyjson: None,
            systemerr: Some(err.to_string()),
        }
    }
}
