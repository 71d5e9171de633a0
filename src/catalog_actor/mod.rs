//! Theme and plan catalog: read-only for provisioning, seeded by the platform.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::{PlanClient, ThemeClient};
use crate::framework::ResourceActor;
use crate::model::{Plan, Theme};

/// Creates a new Theme actor and its client.
pub fn new_themes(buffer_size: usize) -> (ResourceActor<Theme>, ThemeClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, ThemeClient::new(generic_client))
}

/// Creates a new Plan actor and its client.
pub fn new_plans(buffer_size: usize) -> (ResourceActor<Plan>, PlanClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, PlanClient::new(generic_client))
}
