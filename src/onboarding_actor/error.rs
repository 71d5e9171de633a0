//! Error types for the onboarding actors.

use crate::model::{MissingFields, StepKey};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OnboardingRecordError {
    #[error("Onboarding record not found: {0}")]
    NotFound(String),

    #[error("Step {step} is out of order; complete step {} first", .current_step + 1)]
    OutOfOrder { step: StepKey, current_step: u8 },

    #[error("Onboarding is incomplete: {} step(s) missing required fields", .0.len())]
    Incomplete(MissingFields),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
