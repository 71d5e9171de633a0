use crate::deployment_actor::DeploymentError;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{DeploymentCreate, DeploymentMetadata, DeploymentUpdate, StoreId};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the DeploymentMetadata actor.
#[derive(Clone)]
pub struct DeploymentClient {
    inner: ResourceClient<DeploymentMetadata>,
}

impl DeploymentClient {
    pub fn new(inner: ResourceClient<DeploymentMetadata>) -> Self {
        Self { inner }
    }

    /// Creates the row, or points an existing one at the new workspace.
    #[instrument(skip(self))]
    pub async fn upsert_workspace(
        &self,
        id: StoreId,
        workspace: DeploymentCreate,
    ) -> Result<DeploymentMetadata, DeploymentError> {
        debug!("Sending request");
        let update = DeploymentUpdate {
            merchant_id: Some(workspace.merchant_id.clone()),
            tenant_namespace: Some(workspace.tenant_namespace.clone()),
            ..Default::default()
        };
        self.inner
            .upsert(id, workspace, update)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: StoreId,
        update: DeploymentUpdate,
    ) -> Result<DeploymentMetadata, DeploymentError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    pub async fn count(&self) -> Result<usize, DeploymentError> {
        Ok(self.list().await?.len())
    }
}

#[async_trait]
impl ActorClient<DeploymentMetadata> for DeploymentClient {
    type Error = DeploymentError;

    fn inner(&self) -> &ResourceClient<DeploymentMetadata> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<DeploymentError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => DeploymentError::NotFound(id),
            Err(other) => DeploymentError::ActorCommunicationError(other.to_string()),
        }
    }
}
