//! Error types for the catalog actors.

use thiserror::Error;

/// Errors that can occur while reading or seeding themes and plans.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog entry not found: {0}")]
    NotFound(String),

    #[error("Invalid catalog entry: {0}")]
    Invalid(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
