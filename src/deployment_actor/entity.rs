//! [`ActorEntity`] implementation for [`DeploymentMetadata`].

use super::DeploymentError;
use crate::framework::ActorEntity;
use crate::model::{DeploymentCreate, DeploymentMetadata, DeploymentUpdate, StoreId};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for DeploymentMetadata {
    type Id = StoreId;
    type Create = DeploymentCreate;
    type Update = DeploymentUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = DeploymentError;

    fn from_create_params(id: StoreId, params: DeploymentCreate) -> Result<Self, DeploymentError> {
        let now = Utc::now();
        Ok(Self {
            store_id: id,
            merchant_id: params.merchant_id,
            tenant_namespace: params.tenant_namespace,
            dashboard_url: None,
            website_url: None,
            theme_slug: None,
            deployment_config: serde_json::Value::Object(serde_json::Map::new()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fills in the given fields. `config_patch` keys overwrite matching keys of
    /// `deployment_config` and leave the others in place.
    async fn on_update(&mut self, update: DeploymentUpdate, _ctx: &()) -> Result<(), DeploymentError> {
        if let Some(merchant_id) = update.merchant_id {
            self.merchant_id = merchant_id;
        }
        if let Some(namespace) = update.tenant_namespace {
            self.tenant_namespace = namespace;
        }
        if let Some(url) = update.dashboard_url {
            self.dashboard_url = Some(url);
        }
        if let Some(url) = update.website_url {
            self.website_url = Some(url);
        }
        if let Some(slug) = update.theme_slug {
            self.theme_slug = Some(slug);
        }
        if let Some(patch) = update.config_patch {
            let config = self
                .deployment_config
                .as_object_mut()
                .ok_or(DeploymentError::InvalidConfig)?;
            config.extend(patch);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), DeploymentError> {
        Ok(())
    }
}
