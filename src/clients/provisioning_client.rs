//! # Provisioning Client
//!
//! Run-state API for the `MerchantProvisioning` actor.

use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{
    ErrorLog, MerchantProvisioning, ProvisioningConfig, ProvisioningRequest, ProvisioningStep,
    StoreId,
};
use crate::provisioning_actor::{ProvisioningAction, ProvisioningRecordError};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct ProvisioningClient {
    inner: ResourceClient<MerchantProvisioning>,
}

impl ProvisioningClient {
    pub fn new(inner: ResourceClient<MerchantProvisioning>) -> Self {
        Self { inner }
    }

    /// Creates the store's row if absent; a given config refreshes its snapshot.
    #[instrument(skip(self, requested_config))]
    pub async fn ensure(
        &self,
        id: StoreId,
        requested_config: Option<ProvisioningConfig>,
    ) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        debug!("Sending request");
        let request = ProvisioningRequest { requested_config };
        self.inner
            .upsert(id, request.clone(), request)
            .await
            .map_err(Self::map_error)
    }

    pub async fn fetch(&self, id: StoreId) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        self.get(id)
            .await?
            .ok_or_else(|| ProvisioningRecordError::NotFound(id.to_string()))
    }

    pub async fn begin_run(&self, id: StoreId) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        self.act(id, ProvisioningAction::BeginRun).await
    }

    pub async fn record_checkpoint(
        &self,
        id: StoreId,
        step: ProvisioningStep,
    ) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        self.act(id, ProvisioningAction::RecordCheckpoint(step)).await
    }

    pub async fn complete(&self, id: StoreId) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        self.act(id, ProvisioningAction::Complete).await
    }

    pub async fn fail(
        &self,
        id: StoreId,
        error_log: ErrorLog,
    ) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        self.act(id, ProvisioningAction::Fail(error_log)).await
    }

    pub async fn reset_for_retry(
        &self,
        id: StoreId,
    ) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        self.act(id, ProvisioningAction::ResetForRetry).await
    }

    #[instrument(skip(self))]
    async fn act(
        &self,
        id: StoreId,
        action: ProvisioningAction,
    ) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        debug!("Sending action");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<MerchantProvisioning> for ProvisioningClient {
    type Error = ProvisioningRecordError;

    fn inner(&self) -> &ResourceClient<MerchantProvisioning> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<ProvisioningRecordError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => ProvisioningRecordError::NotFound(id),
            Err(other) => ProvisioningRecordError::ActorCommunicationError(other.to_string()),
        }
    }
}
