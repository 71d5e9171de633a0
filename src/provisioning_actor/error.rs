//! Error types for the MerchantProvisioning actor.

use crate::model::{ProvisioningStatus, ProvisioningStep, StoreId};
use thiserror::Error;

/// Errors raised by the provisioning record's state machine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProvisioningRecordError {
    #[error("Provisioning record not found: {0}")]
    NotFound(String),

    #[error("Store {0} is already provisioned")]
    AlreadyCompleted(StoreId),

    #[error("Provisioning already in progress for store {0}")]
    InProgress(StoreId),

    #[error("Provisioning for store {store_id} is {status}; only FAILED runs can be retried")]
    NotRetryable {
        store_id: StoreId,
        status: ProvisioningStatus,
    },

    #[error("Invalid provisioning transition {from} -> {to}")]
    InvalidTransition {
        from: ProvisioningStatus,
        to: ProvisioningStatus,
    },

    #[error("Checkpoint {attempted} does not advance past {current:?}")]
    CheckpointRegression {
        current: Option<ProvisioningStep>,
        attempted: ProvisioningStep,
    },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
