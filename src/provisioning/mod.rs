//! Merchant provisioning: the pipeline orchestrator and the adapters it drives.

pub mod adapters;
pub mod error;
pub mod orchestrator;

pub use adapters::*;
pub use error::*;
pub use orchestrator::*;
