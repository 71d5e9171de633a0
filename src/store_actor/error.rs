//! Error types for the Store actor.

use crate::model::{PlanId, ProvisioningStatus};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The requested store was not found.
    #[error("Store not found: {0}")]
    NotFound(String),

    /// Another store already uses this subdomain.
    #[error("Subdomain already taken: {0}")]
    SubdomainTaken(String),

    #[error("Plan not found: {0}")]
    PlanNotFound(PlanId),

    #[error("Store is already provisioned")]
    AlreadyProvisioned,

    #[error("Store provisioning cannot move from {from} to {to}")]
    InvalidTransition {
        from: ProvisioningStatus,
        to: ProvisioningStatus,
    },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
