use crate::model::{StoreId, ThemeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational settings of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub store_id: StoreId,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub logo_url: Option<String>,
    pub currency: String,
    pub timezone: String,
    pub locale: String,
    pub updated_at: DateTime<Utc>,
}

/// Values for a fresh settings row.
#[derive(Debug, Clone)]
pub struct StoreSettingsCreate {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub logo_url: Option<String>,
    pub currency: String,
    pub timezone: String,
    pub locale: String,
}

impl Default for StoreSettingsCreate {
    fn default() -> Self {
        Self {
            contact_email: None,
            contact_phone: None,
            logo_url: None,
            currency: "USD".to_string(),
            timezone: "UTC".to_string(),
            locale: "en".to_string(),
        }
    }
}

/// `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct StoreSettingsUpdate {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub logo_url: Option<String>,
}

impl From<StoreSettingsUpdate> for StoreSettingsCreate {
    fn from(update: StoreSettingsUpdate) -> Self {
        Self {
            contact_email: update.contact_email,
            contact_phone: update.contact_phone,
            logo_url: update.logo_url,
            ..Self::default()
        }
    }
}

/// The storefront's customization document, seeded from its theme's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteCustomization {
    pub store_id: StoreId,
    pub theme_id: ThemeId,
    pub document: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Theme defaults used both to create the document and to reset it on theme change.
#[derive(Debug, Clone)]
pub struct CustomizationDefaults {
    pub theme_id: ThemeId,
    pub document: serde_json::Value,
}
