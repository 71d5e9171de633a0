//! Store settings and website customization, both one-to-one with a store.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::{CustomizationClient, SettingsClient};
use crate::framework::ResourceActor;
use crate::model::{StoreSettings, WebsiteCustomization};

/// Creates a new StoreSettings actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<StoreSettings>, SettingsClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, SettingsClient::new(generic_client))
}

/// Creates a new WebsiteCustomization actor and its client.
pub fn new_customizations(
    buffer_size: usize,
) -> (ResourceActor<WebsiteCustomization>, CustomizationClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CustomizationClient::new(generic_client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomizationDefaults, StoreId, StoreSettingsUpdate, ThemeId};
    use serde_json::json;

    #[tokio::test]
    async fn test_defaults_do_not_overwrite_contact_details() {
        let (actor, client) = new(8);
        tokio::spawn(actor.run(()));
        let id = StoreId(1);

        client
            .update_contact(
                id,
                StoreSettingsUpdate {
                    contact_email: Some("ops@acme.test".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let settings = client.ensure_defaults(id).await.unwrap();
        assert_eq!(settings.contact_email.as_deref(), Some("ops@acme.test"));
        assert_eq!(settings.currency, "USD");
    }

    #[tokio::test]
    async fn test_theme_change_resets_customization() {
        let (actor, client) = new_customizations(8);
        tokio::spawn(actor.run(()));
        let id = StoreId(1);
        let defaults = |theme: &str, color: &str| CustomizationDefaults {
            theme_id: ThemeId::new(theme),
            document: json!({ "primaryColor": color }),
        };

        client.seed(id, defaults("minimal", "#000")).await.unwrap();
        let same = client.seed(id, defaults("minimal", "#fff")).await.unwrap();
        assert_eq!(same.document["primaryColor"], "#000");

        let switched = client.seed(id, defaults("bold", "#f00")).await.unwrap();
        assert_eq!(switched.theme_id, ThemeId::new("bold"));
        assert_eq!(switched.document["primaryColor"], "#f00");
    }
}
