use crate::catalog_actor::CatalogError;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Plan, PlanCreate, PlanId, Theme, ThemeCreate, ThemeId};
use async_trait::async_trait;
use tracing::instrument;

fn map_catalog_error(e: FrameworkError) -> CatalogError {
    match e.into_entity_error::<CatalogError>() {
        Ok(err) => err,
        Err(FrameworkError::NotFound(id)) => CatalogError::NotFound(id),
        Err(FrameworkError::Conflict(slug)) => CatalogError::Invalid(format!("slug {slug} already used")),
        Err(other) => CatalogError::ActorCommunicationError(other.to_string()),
    }
}

/// Theme lookup; provisioning treats an absent theme as `ThemeNotFound`.
#[derive(Clone)]
pub struct ThemeClient {
    inner: ResourceClient<Theme>,
}

impl ThemeClient {
    pub fn new(inner: ResourceClient<Theme>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, theme), fields(slug = %theme.slug))]
    pub async fn seed(&self, id: ThemeId, theme: ThemeCreate) -> Result<Theme, CatalogError> {
        self.inner
            .upsert(id, theme.clone(), theme)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Theme> for ThemeClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Theme> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_catalog_error(e)
    }
}

#[derive(Clone)]
pub struct PlanClient {
    inner: ResourceClient<Plan>,
}

impl PlanClient {
    pub fn new(inner: ResourceClient<Plan>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, plan))]
    pub async fn seed(&self, id: PlanId, plan: PlanCreate) -> Result<Plan, CatalogError> {
        self.inner
            .upsert(id, plan.clone(), plan)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Plan> for PlanClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Plan> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_catalog_error(e)
    }
}
