//! Request dispatch
//!
//! Maps a step method onto exactly one cluster API call.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{ApiError, ExecutorError, Result};
use crate::k8s::{ApiRequest, ApiResponse, ClusterApi};
use crate::models::{RequestDescriptor, StepMethod};

/// Status code and raw body captured from one API call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatched {
    /// `None` when the call has no status code (`version`)
    pub code: Option<u16>,
    pub body: Vec<u8>,
}

/// Dispatches requests, bounding each call by an optional timeout
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Perform the call a descriptor asks for
    pub async fn dispatch<C: ClusterApi>(
        &self,
        cluster: &C,
        desc: &RequestDescriptor,
    ) -> Result<Dispatched> {
        desc.validate()?;

        match &desc.method {
            StepMethod::Version => {
                debug!("Querying server version");
                let info = self.bounded(cluster.server_version()).await?;
                let body = serde_json::to_vec(&info).map_err(ExecutorError::ResultFormat)?;
                Ok(Dispatched { code: None, body })
            }
            StepMethod::Get => {
                let request = ApiRequest::get(
                    &desc.namespace,
                    &desc.resource,
                    desc.entry_name.as_deref(),
                    desc.label_selector.as_deref(),
                );
                let response = self.send(cluster, request).await?;

                // A missing object is an answer, not a failure
                if response.is_success() || response.status == 404 {
                    Ok(response.into())
                } else {
                    Err(status_error(response))
                }
            }
            StepMethod::Delete => {
                let name = desc.require_entry_name()?;
                let request = ApiRequest::delete(&desc.namespace, &desc.resource, name);
                self.send_checked(cluster, request).await
            }
            StepMethod::Create => {
                let body = desc.body.clone().unwrap_or_default();
                let request = ApiRequest::create(&desc.namespace, &desc.resource, body);
                self.send_checked(cluster, request).await
            }
            StepMethod::Unsupported(method) => {
                Err(ExecutorError::UnsupportedMethod(method.clone()))
            }
        }
    }

    async fn send_checked<C: ClusterApi>(
        &self,
        cluster: &C,
        request: ApiRequest,
    ) -> Result<Dispatched> {
        let response = self.send(cluster, request).await?;
        if response.is_success() {
            Ok(response.into())
        } else {
            Err(status_error(response))
        }
    }

    async fn send<C: ClusterApi>(&self, cluster: &C, request: ApiRequest) -> Result<ApiResponse> {
        debug!("{} {}", request.method, request.path);

        let start = Instant::now();
        let response = self.bounded(cluster.execute(request)).await?;

        debug!(
            "Cluster API answered {} in {}ms ({} bytes)",
            response.status,
            start.elapsed().as_millis(),
            response.body.len()
        );
        Ok(response)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ApiError::Timeout(limit))?,
            None => call.await,
        }
    }
}

impl From<ApiResponse> for Dispatched {
    fn from(response: ApiResponse) -> Self {
        Self {
            code: Some(response.status),
            body: response.body,
        }
    }
}

fn status_error(response: ApiResponse) -> ExecutorError {
    ApiError::Status {
        code: response.status,
        message: response.error_message(),
    }
    .into()
}
