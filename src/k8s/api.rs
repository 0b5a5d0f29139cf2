//! Raw cluster API requests
//!
//! A step talks to the API through [`ClusterApi`]: one version query or one
//! raw request whose status and body are handed back untouched.

use http::{header, Method, Request};
use k8s_openapi::apimachinery::pkg::version::Info;
use std::future::Future;

use crate::error::ApiError;

/// Prefix of the core resource API group
const CORE_API_PREFIX: &str = "/api/v1";

/// Access to one cluster's API
///
/// Implementations must not retry and must report the status code of
/// every response they receive, success or not.
pub trait ClusterApi {
    /// Query server version metadata
    fn server_version(&self) -> impl Future<Output = Result<Info, ApiError>> + Send;

    /// Send one request and return the response envelope
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;
}

/// Request against the core resource API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path including any query string
    pub path: String,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// GET a collection or a named entry, optionally filtered by labels
    pub fn get(
        namespace: &str,
        resource: &str,
        name: Option<&str>,
        label_selector: Option<&str>,
    ) -> Self {
        let mut path = resource_path(namespace, resource, name);
        if let Some(selector) = label_selector {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("labelSelector", selector)
                .finish();
            path.push('?');
            path.push_str(&query);
        }

        Self {
            method: Method::GET,
            path,
            body: None,
        }
    }

    /// DELETE a named entry
    pub fn delete(namespace: &str, resource: &str, name: &str) -> Self {
        Self {
            method: Method::DELETE,
            path: resource_path(namespace, resource, Some(name)),
            body: None,
        }
    }

    /// POST a raw body to a collection
    pub fn create(namespace: &str, resource: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: Method::POST,
            path: resource_path(namespace, resource, None),
            body: Some(body.into()),
        }
    }

    /// Build the HTTP request sent over the wire
    pub fn into_http(self) -> Result<Request<Vec<u8>>, http::Error> {
        let builder = Request::builder()
            .method(self.method)
            .uri(self.path)
            .header(header::ACCEPT, "application/json");

        match self.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body),
            None => builder.body(Vec::new()),
        }
    }
}

/// Status and raw body of an API response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Success range of the core REST client; other 2xx codes are failures
    pub fn is_success(&self) -> bool {
        (200..=206).contains(&self.status)
    }

    /// Human-readable failure message: the `message` of a Kubernetes
    /// `Status` body if there is one, the body text otherwise.
    pub fn error_message(&self) -> String {
        serde_json::from_slice::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| String::from_utf8_lossy(&self.body).trim().to_string())
    }
}

/// Path of a core resource collection or entry. An empty namespace
/// addresses the resource cluster-wide.
pub fn resource_path(namespace: &str, resource: &str, name: Option<&str>) -> String {
    let mut path = String::from(CORE_API_PREFIX);
    if !namespace.is_empty() {
        path.push_str("/namespaces/");
        path.push_str(namespace);
    }
    path.push('/');
    path.push_str(resource);
    if let Some(name) = name {
        path.push('/');
        path.push_str(name);
    }
    path
}
