//! kube-step - Kubernetes test-step executor
//!
//! Takes one declarative step (method, namespace, resource, name, selector,
//! payload), performs one call against the Kubernetes API and returns a
//! uniform result: the status code plus the response body decoded as JSON.
//!
//! Supported methods:
//!
//! - `version`: server version metadata
//! - `get`: a collection or a named entry; a 404 is returned as a result
//! - `delete`: a named entry
//! - `create`: POST of a raw payload
//!
//! ```no_run
//! # async fn demo() -> kube_step::Result<()> {
//! let step = serde_json::json!({
//!     "method": "get",
//!     "namespace": "default",
//!     "resource": "pods",
//!     "labelselector": "app=web",
//! });
//! let result = kube_step::StepExecutor::new().run(&step).await?;
//! println!("{:?}", result.code);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod k8s;
pub mod models;
pub mod utils;

pub use error::{ApiError, ConfigError, DecodingError, ExecutorError, Result};
pub use executor::StepExecutor;
pub use models::{InvocationResult, RequestDescriptor, StepMethod, StepRecord};

/// Name the host uses to route steps to this executor
pub const NAME: &str = "kubernetes";
