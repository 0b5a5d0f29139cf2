//! Step decoding
//!
//! Turns the loosely-typed step record handed over by the host into a
//! [`RequestDescriptor`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{DecodingError, ExecutorError};

/// Operation requested by a step
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StepMethod {
    /// Query server version metadata
    Version,
    /// GET a collection or a single entry
    Get,
    /// DELETE a single entry
    Delete,
    /// POST a raw payload
    Create,
    /// Anything else; rejected at dispatch time
    Unsupported(String),
}

impl StepMethod {
    /// Parse a method string. Never fails: unknown values are kept verbatim.
    pub fn parse(s: &str) -> Self {
        match s {
            "version" => StepMethod::Version,
            "get" => StepMethod::Get,
            "delete" => StepMethod::Delete,
            "create" => StepMethod::Create,
            other => StepMethod::Unsupported(other.to_string()),
        }
    }

    /// Method string as written in a step
    pub fn as_str(&self) -> &str {
        match self {
            StepMethod::Version => "version",
            StepMethod::Get => "get",
            StepMethod::Delete => "delete",
            StepMethod::Create => "create",
            StepMethod::Unsupported(s) => s,
        }
    }

    /// Get all supported methods
    pub fn all() -> Vec<StepMethod> {
        vec![
            StepMethod::Version,
            StepMethod::Get,
            StepMethod::Delete,
            StepMethod::Create,
        ]
    }

    /// One-line description of what the method does
    pub fn description(&self) -> &'static str {
        match self {
            StepMethod::Version => "query server version (no status code)",
            StepMethod::Get => "GET resource or entry, honors labelselector, 404 is a result",
            StepMethod::Delete => "DELETE entry, entryname required",
            StepMethod::Create => "POST data as the raw request body",
            StepMethod::Unsupported(_) => "unsupported",
        }
    }
}

impl Serialize for StepMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for StepMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step record after shape validation
///
/// Field names are the ones the host writes in its test suites.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StepRecord {
    /// One of `version`, `get`, `delete`, `create`
    pub method: Option<String>,
    /// Target namespace; empty means cluster-wide path
    pub namespace: Option<String>,
    /// Plural resource kind, e.g. `pods`
    pub resource: Option<String>,
    /// Object name; required for `delete`
    pub entryname: Option<String>,
    /// Raw request body for `create`
    pub data: Option<String>,
    /// Path to a kubeconfig file
    pub configfilepath: Option<String>,
    /// Label selector, used by `get` only
    pub labelselector: Option<String>,
}

impl StepRecord {
    /// Validate an untyped step. Keys match case-insensitively; unknown
    /// keys are ignored; known keys must hold a string or null.
    pub fn from_value(step: &Value) -> Result<Self, DecodingError> {
        let map = step
            .as_object()
            .ok_or_else(|| DecodingError::NotAnObject(json_type(step)))?;

        Ok(Self {
            method: string_field(map, "method")?,
            namespace: string_field(map, "namespace")?,
            resource: string_field(map, "resource")?,
            entryname: string_field(map, "entryname")?,
            data: string_field(map, "data")?,
            configfilepath: string_field(map, "configfilepath")?,
            labelselector: string_field(map, "labelselector")?,
        })
    }
}

fn string_field(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, DecodingError> {
    let found = map
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(field))
        .map(|(_, value)| value);

    match found {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DecodingError::InvalidField {
            field,
            expected: "string",
            found: json_type(other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Typed request for one invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    pub method: StepMethod,
    pub namespace: String,
    pub resource: String,
    pub entry_name: Option<String>,
    pub label_selector: Option<String>,
    pub body: Option<String>,
    pub config_path: Option<String>,
}

impl RequestDescriptor {
    /// Decode an untyped step record
    pub fn from_step(step: &Value) -> Result<Self, DecodingError> {
        Ok(StepRecord::from_value(step)?.into())
    }

    /// Create a descriptor for the given method and resource
    pub fn new(method: StepMethod, resource: impl Into<String>) -> Self {
        Self {
            method,
            namespace: String::new(),
            resource: resource.into(),
            entry_name: None,
            label_selector: None,
            body: None,
            config_path: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_entry_name(mut self, name: impl Into<String>) -> Self {
        self.entry_name = non_empty(Some(name.into()));
        self
    }

    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = non_empty(Some(selector.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = non_empty(Some(body.into()));
        self
    }

    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = non_empty(Some(path.into()));
        self
    }

    /// Entry name, which `delete` cannot do without
    pub fn require_entry_name(&self) -> Result<&str, ExecutorError> {
        self.entry_name.as_deref().ok_or_else(|| {
            ExecutorError::Validation(format!(
                "{} on `{}` requires an entryname",
                self.method, self.resource
            ))
        })
    }

    /// Check the method and its required fields without calling the API.
    /// Namespace, resource and entry name must each stay one path segment.
    pub fn validate(&self) -> Result<(), ExecutorError> {
        match &self.method {
            StepMethod::Unsupported(method) => {
                return Err(ExecutorError::UnsupportedMethod(method.clone()))
            }
            StepMethod::Version => return Ok(()),
            _ => {}
        }

        check_path_segment("namespace", &self.namespace)?;
        check_path_segment("resource", &self.resource)?;
        if let Some(name) = &self.entry_name {
            check_path_segment("entryname", name)?;
        }

        if self.method == StepMethod::Delete {
            self.require_entry_name()?;
        }
        Ok(())
    }
}

/// Reject values that would address a different path than the one named
fn check_path_segment(field: &str, value: &str) -> Result<(), ExecutorError> {
    if value == "." || value == ".." {
        return Err(ExecutorError::Validation(format!(
            "{field} {value:?} may not be '.' or '..'"
        )));
    }
    if value.contains(['/', '%']) {
        return Err(ExecutorError::Validation(format!(
            "{field} {value:?} may not contain '/' or '%'"
        )));
    }
    Ok(())
}

impl From<StepRecord> for RequestDescriptor {
    fn from(record: StepRecord) -> Self {
        Self {
            method: StepMethod::parse(record.method.as_deref().unwrap_or_default()),
            namespace: record.namespace.unwrap_or_default(),
            resource: record.resource.unwrap_or_default(),
            entry_name: non_empty(record.entryname),
            label_selector: non_empty(record.labelselector),
            body: non_empty(record.data),
            config_path: non_empty(record.configfilepath),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
