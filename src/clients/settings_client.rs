use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{
    CustomizationDefaults, StoreId, StoreSettings, StoreSettingsCreate, StoreSettingsUpdate,
    WebsiteCustomization,
};
use crate::settings_actor::SettingsError;
use async_trait::async_trait;
use tracing::{debug, instrument};

fn map_settings_error(e: FrameworkError) -> SettingsError {
    match e.into_entity_error::<SettingsError>() {
        Ok(err) => err,
        Err(FrameworkError::NotFound(id)) => SettingsError::NotFound(id),
        Err(other) => SettingsError::ActorCommunicationError(other.to_string()),
    }
}

/// Client for the StoreSettings actor.
#[derive(Clone)]
pub struct SettingsClient {
    inner: ResourceClient<StoreSettings>,
}

impl SettingsClient {
    pub fn new(inner: ResourceClient<StoreSettings>) -> Self {
        Self { inner }
    }

    /// Creates default settings if absent; existing settings are left as they are.
    #[instrument(skip(self))]
    pub async fn ensure_defaults(&self, id: StoreId) -> Result<StoreSettings, SettingsError> {
        debug!("Sending request");
        self.inner
            .upsert(id, StoreSettingsCreate::default(), StoreSettingsUpdate::default())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_contact(
        &self,
        id: StoreId,
        update: StoreSettingsUpdate,
    ) -> Result<StoreSettings, SettingsError> {
        debug!("Sending request");
        self.inner
            .upsert(id, update.clone().into(), update)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<StoreSettings> for SettingsClient {
    type Error = SettingsError;

    fn inner(&self) -> &ResourceClient<StoreSettings> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_settings_error(e)
    }
}

/// Client for the WebsiteCustomization actor.
#[derive(Clone)]
pub struct CustomizationClient {
    inner: ResourceClient<WebsiteCustomization>,
}

impl CustomizationClient {
    pub fn new(inner: ResourceClient<WebsiteCustomization>) -> Self {
        Self { inner }
    }

    /// Seeds the document from theme defaults.
    #[instrument(skip(self, defaults), fields(theme_id = %defaults.theme_id))]
    pub async fn seed(
        &self,
        id: StoreId,
        defaults: CustomizationDefaults,
    ) -> Result<WebsiteCustomization, SettingsError> {
        debug!("Sending request");
        self.inner
            .upsert(id, defaults.clone(), defaults)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<WebsiteCustomization> for CustomizationClient {
    type Error = SettingsError;

    fn inner(&self) -> &ResourceClient<WebsiteCustomization> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_settings_error(e)
    }
}
