//! Kubernetes API access
//!
//! Client resolution and the raw request seam used by the dispatcher.

mod api;
mod client;

pub use api::{resource_path, ApiRequest, ApiResponse, ClusterApi};
pub use client::{ClientResolver, ConfigSource, KubeCluster};

#[cfg(test)]
pub(crate) mod fake;
