//! Data models for step execution
//!
//! The typed request a step decodes into and the result it produces.

mod result;
mod step;

pub use result::InvocationResult;
pub use step::{RequestDescriptor, StepMethod, StepRecord};
