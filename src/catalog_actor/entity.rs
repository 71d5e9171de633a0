//! [`ActorEntity`] implementations for [`Theme`] and [`Plan`].
//!
//! Catalog entries are keyed by their public id and replaced wholesale on update.

use super::CatalogError;
use crate::framework::ActorEntity;
use crate::model::{Plan, PlanCreate, PlanId, Theme, ThemeCreate, ThemeId};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Theme {
    type Id = ThemeId;
    type Create = ThemeCreate;
    type Update = ThemeCreate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = CatalogError;

    fn from_create_params(id: ThemeId, params: ThemeCreate) -> Result<Self, CatalogError> {
        if params.slug.trim().is_empty() {
            return Err(CatalogError::Invalid(format!("theme {id} has no slug")));
        }
        Ok(Self {
            id,
            slug: params.slug,
            name: params.name,
            default_customization: params.default_customization,
        })
    }

    /// Theme slugs double as deployment identifiers, so they are unique.
    fn unique_key(&self) -> Option<String> {
        Some(self.slug.clone())
    }

    async fn on_update(&mut self, update: ThemeCreate, _ctx: &()) -> Result<(), CatalogError> {
        *self = Self::from_create_params(self.id.clone(), update)?;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), CatalogError> {
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Plan {
    type Id = PlanId;
    type Create = PlanCreate;
    type Update = PlanCreate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = CatalogError;

    fn from_create_params(id: PlanId, params: PlanCreate) -> Result<Self, CatalogError> {
        Ok(Self {
            id,
            name: params.name,
            monthly_price_cents: params.monthly_price_cents,
        })
    }

    async fn on_update(&mut self, update: PlanCreate, _ctx: &()) -> Result<(), CatalogError> {
        self.name = update.name;
        self.monthly_price_cents = update.monthly_price_cents;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), CatalogError> {
        Ok(())
    }
}
