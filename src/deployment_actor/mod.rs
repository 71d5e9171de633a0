//! Deployment metadata: where a store's workspace, dashboard and website live.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::DeploymentClient;
use crate::framework::ResourceActor;
use crate::model::DeploymentMetadata;

/// Creates a new DeploymentMetadata actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<DeploymentMetadata>, DeploymentClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, DeploymentClient::new(generic_client))
}
