//! [`ActorEntity`] implementations for [`StoreSettings`] and [`WebsiteCustomization`].

use super::SettingsError;
use crate::framework::ActorEntity;
use crate::model::{
    CustomizationDefaults, StoreId, StoreSettings, StoreSettingsCreate, StoreSettingsUpdate,
    WebsiteCustomization,
};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for StoreSettings {
    type Id = StoreId;
    type Create = StoreSettingsCreate;
    type Update = StoreSettingsUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = SettingsError;

    fn from_create_params(id: StoreId, params: StoreSettingsCreate) -> Result<Self, SettingsError> {
        Ok(Self {
            store_id: id,
            contact_email: params.contact_email,
            contact_phone: params.contact_phone,
            logo_url: params.logo_url,
            currency: params.currency,
            timezone: params.timezone,
            locale: params.locale,
            updated_at: Utc::now(),
        })
    }

    async fn on_update(&mut self, update: StoreSettingsUpdate, _ctx: &()) -> Result<(), SettingsError> {
        if let Some(email) = update.contact_email {
            self.contact_email = Some(email);
        }
        if let Some(phone) = update.contact_phone {
            self.contact_phone = Some(phone);
        }
        if let Some(logo) = update.logo_url {
            self.logo_url = Some(logo);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), SettingsError> {
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for WebsiteCustomization {
    type Id = StoreId;
    type Create = CustomizationDefaults;
    type Update = CustomizationDefaults;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = SettingsError;

    fn from_create_params(id: StoreId, params: CustomizationDefaults) -> Result<Self, SettingsError> {
        Ok(Self {
            store_id: id,
            theme_id: params.theme_id,
            document: params.document,
            updated_at: Utc::now(),
        })
    }

    /// Re-seeding with the same theme keeps the merchant's edits; a new theme resets
    /// the document to that theme's defaults.
    async fn on_update(&mut self, update: CustomizationDefaults, _ctx: &()) -> Result<(), SettingsError> {
        if update.theme_id != self.theme_id {
            self.theme_id = update.theme_id;
            self.document = update.document;
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), SettingsError> {
        Ok(())
    }
}
