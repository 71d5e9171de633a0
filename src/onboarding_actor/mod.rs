//! Onboarding progress per store, and the per-step rows behind the admin funnel.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::{OnboardingClient, StepRowClient};
use crate::framework::ResourceActor;
use crate::model::{BrandOnboarding, BrandOnboardingStep};

/// Creates a new BrandOnboarding actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<BrandOnboarding>, OnboardingClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OnboardingClient::new(generic_client))
}

/// Creates a new BrandOnboardingStep actor and its client.
pub fn new_step_rows(buffer_size: usize) -> (ResourceActor<BrandOnboardingStep>, StepRowClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, StepRowClient::new(generic_client))
}
