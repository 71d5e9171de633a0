//! Error types for the DeploymentMetadata actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeploymentError {
    #[error("Deployment metadata not found: {0}")]
    NotFound(String),

    #[error("Deployment config patch must be a JSON object")]
    InvalidConfig,

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
