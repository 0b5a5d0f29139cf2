//! Step execution
//!
//! Runs one step end to end: decode, resolve a client, dispatch, normalize.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::dispatch::Dispatcher;
use super::normalize::normalize;
use crate::error::Result;
use crate::k8s::{ClientResolver, ClusterApi};
use crate::models::{InvocationResult, RequestDescriptor};

/// Executes steps against the cluster their kubeconfig points to.
///
/// Holds no client: every invocation resolves its own, so one executor can
/// serve concurrent invocations.
#[derive(Clone, Debug, Default)]
pub struct StepExecutor {
    resolver: ClientResolver,
    dispatcher: Dispatcher,
}

impl StepExecutor {
    /// Create a new executor without a request timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each API call by a timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.resolver = self.resolver.with_read_timeout(timeout);
        self.dispatcher = self.dispatcher.with_timeout(timeout);
        self
    }

    /// Run an untyped step record
    pub async fn run(&self, step: &Value) -> Result<InvocationResult> {
        let desc = RequestDescriptor::from_step(step)?;
        self.run_descriptor(&desc).await
    }

    /// Run a decoded step
    pub async fn run_descriptor(&self, desc: &RequestDescriptor) -> Result<InvocationResult> {
        let cluster = self.resolver.resolve(desc.config_path.as_deref()).await?;
        debug!("Using cluster configuration {:?}", cluster.source());

        self.run_with(&cluster, desc).await
    }

    /// Run a decoded step against a given cluster
    pub async fn run_with<C: ClusterApi>(
        &self,
        cluster: &C,
        desc: &RequestDescriptor,
    ) -> Result<InvocationResult> {
        debug!("Running {} on {:?}", desc.method, desc.resource);

        let dispatched = self.dispatcher.dispatch(cluster, desc).await?;
        normalize(&dispatched.body, dispatched.code)
    }
}
