//! # Store Client
//!
//! High-level API for the `Store` actor. Conditional transitions go through
//! [`StoreAction`] so they are checked and written in one step.

use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{OwnerId, ProvisioningConfig, Store, StoreCreate, StoreId, StoreUpdate};
use crate::store_actor::{StoreAction, StoreError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Store actor.
#[derive(Clone)]
pub struct StoreClient {
    inner: ResourceClient<Store>,
}

impl StoreClient {
    pub fn new(inner: ResourceClient<Store>) -> Self {
        Self { inner }
    }

    /// Creates a store; fails with [`StoreError::SubdomainTaken`] on collision.
    #[instrument(skip(self, params), fields(subdomain = %params.subdomain))]
    pub async fn create_store(&self, params: StoreCreate) -> Result<StoreId, StoreError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Like [`ActorClient::get`], but an absent store is an error.
    pub async fn fetch(&self, id: StoreId) -> Result<Store, StoreError> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn find_by_owner(&self, owner_id: &OwnerId) -> Result<Option<Store>, StoreError> {
        let stores = self.list().await?;
        Ok(stores.into_iter().find(|store| &store.owner_id == owner_id))
    }

    #[instrument(skip(self))]
    pub async fn update_store(&self, id: StoreId, update: StoreUpdate) -> Result<Store, StoreError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn apply_provisioning_config(
        &self,
        id: StoreId,
        config: ProvisioningConfig,
    ) -> Result<Store, StoreError> {
        self.act(id, StoreAction::ApplyProvisioningConfig(config)).await
    }

    pub async fn mark_provisioning_failed(&self, id: StoreId) -> Result<Store, StoreError> {
        self.act(id, StoreAction::MarkProvisioningFailed).await
    }

    pub async fn mark_provisioned(&self, id: StoreId) -> Result<Store, StoreError> {
        self.act(id, StoreAction::MarkProvisioned).await
    }

    pub async fn complete_onboarding(&self, id: StoreId) -> Result<Store, StoreError> {
        self.act(id, StoreAction::CompleteOnboarding).await
    }

    pub async fn force_activate(&self, id: StoreId) -> Result<Store, StoreError> {
        self.act(id, StoreAction::ForceActivate).await
    }

    async fn act(&self, id: StoreId, action: StoreAction) -> Result<Store, StoreError> {
        debug!(store_id = %id, ?action, "Sending action");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Store> for StoreClient {
    type Error = StoreError;

    fn inner(&self) -> &ResourceClient<Store> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<StoreError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => StoreError::NotFound(id),
            Err(FrameworkError::Conflict(subdomain)) => StoreError::SubdomainTaken(subdomain),
            Err(other) => StoreError::ActorCommunicationError(other.to_string()),
        }
    }
}
