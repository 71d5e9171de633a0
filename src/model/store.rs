use crate::model::{OnboardingStatus, PlanId, ProvisioningConfig, ProvisioningStatus, ThemeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreId(pub u32);

impl From<u32> for StoreId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store_{}", self.0)
    }
}

/// Identifier of the merchant user owning a store. Users live outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A merchant tenant.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
/// Its subdomain is the actor's unique key, so no two stores can share one.
///
/// See [`impl ActorEntity for Store`](#impl-ActorEntity-for-Store) for details on:
/// - Creation parameters ([`StoreCreate`])
/// - Update parameters ([`StoreUpdate`])
/// - Conditional transitions ([`StoreAction`](crate::store_actor::StoreAction))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub owner_id: OwnerId,
    pub owner_email: String,
    pub name: String,
    pub subdomain: String,
    pub custom_domain: Option<String>,
    pub category: Option<String>,
    pub theme_id: Option<ThemeId>,
    pub plan_id: Option<PlanId>,
    pub integrations: Vec<String>,
    pub is_active: bool,
    pub provisioning_status: ProvisioningStatus,
    pub onboarding_status: OnboardingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// The configuration written by the last `STORE_CONFIGURED` step, if it ran.
    pub fn provisioning_config(&self) -> Option<ProvisioningConfig> {
        Some(ProvisioningConfig {
            theme_id: self.theme_id.clone()?,
            plan_id: self.plan_id.clone()?,
            subdomain: Some(self.subdomain.clone()),
            domain: self.custom_domain.clone(),
            category: self.category.clone()?,
            integrations: self.integrations.clone(),
        })
    }
}

/// Payload for creating a new store.
#[derive(Debug, Clone)]
pub struct StoreCreate {
    pub owner_id: OwnerId,
    pub owner_email: String,
    pub name: String,
    pub subdomain: String,
    pub category: Option<String>,
}

/// Payload for updating an existing store. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub custom_domain: Option<String>,
    pub onboarding_status: Option<OnboardingStatus>,
}
