//! Step execution engine
//!
//! Dispatches a decoded step to the cluster and normalizes the answer.

mod dispatch;
mod normalize;
mod runner;

pub use dispatch::{Dispatched, Dispatcher};
pub use normalize::normalize;
pub use runner::StepExecutor;
