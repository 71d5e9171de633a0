//! Onboarding state machine: five wizard steps collected before provisioning.

pub mod error;
pub mod service;
pub mod slug;

pub use error::*;
pub use service::*;
