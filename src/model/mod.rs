//! Tenant records managed by the record actors, plus their create/update payloads.

pub mod catalog;
pub mod deployment;
pub mod onboarding;
pub mod provisioning;
pub mod settings;
pub mod store;

pub use catalog::*;
pub use deployment::*;
pub use onboarding::*;
pub use provisioning::*;
pub use settings::*;
pub use store::*;
