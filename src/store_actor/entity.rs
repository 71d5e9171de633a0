//! [`ActorEntity`] implementation for [`Store`].
//!
//! The subdomain is the unique key, so creating or re-configuring a store onto a taken
//! subdomain is rejected by the actor. The context is the plan catalog client, used
//! to validate the plan before provisioning writes it.

use super::{StoreAction, StoreError};
use crate::clients::PlanClient;
use crate::framework::{ActorClient, ActorEntity};
use crate::model::{OnboardingStatus, ProvisioningStatus, Store, StoreCreate, StoreId, StoreUpdate};
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

#[async_trait]
impl ActorEntity for Store {
    type Id = StoreId;
    type Create = StoreCreate;
    type Update = StoreUpdate;
    type Action = StoreAction;
    type ActionResult = Store;
    type Context = PlanClient;
    type Error = StoreError;

    fn from_create_params(id: StoreId, params: StoreCreate) -> Result<Self, StoreError> {
        let now = Utc::now();
        Ok(Self {
            id,
            owner_id: params.owner_id,
            owner_email: params.owner_email,
            name: params.name,
            subdomain: params.subdomain,
            custom_domain: None,
            category: params.category,
            theme_id: None,
            plan_id: None,
            integrations: Vec::new(),
            is_active: false,
            provisioning_status: ProvisioningStatus::Pending,
            onboarding_status: OnboardingStatus::NotStarted,
            created_at: now,
            updated_at: now,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.subdomain.clone())
    }

    /// # Fields Updated
    /// - `name`, `category`, `custom_domain`
    /// - `onboarding_status`: never moves back from COMPLETED
    async fn on_update(&mut self, update: StoreUpdate, _ctx: &PlanClient) -> Result<(), StoreError> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(domain) = update.custom_domain {
            self.custom_domain = Some(domain);
        }
        if let Some(status) = update.onboarding_status {
            if self.onboarding_status != OnboardingStatus::Completed {
                self.onboarding_status = status;
            }
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: StoreAction,
        plans: &PlanClient,
    ) -> Result<Store, StoreError> {
        match action {
            StoreAction::ApplyProvisioningConfig(config) => {
                if self.provisioning_status == ProvisioningStatus::Completed {
                    return Err(StoreError::AlreadyProvisioned);
                }
                plans
                    .get(config.plan_id.clone())
                    .await
                    .map_err(|e| StoreError::ActorCommunicationError(e.to_string()))?
                    .ok_or_else(|| StoreError::PlanNotFound(config.plan_id.clone()))?;

                debug!(store_id = %self.id, theme_id = %config.theme_id, plan_id = %config.plan_id, "Applying provisioning config");
                self.theme_id = Some(config.theme_id);
                self.plan_id = Some(config.plan_id);
                self.category = Some(config.category);
                self.integrations = config.integrations;
                if let Some(subdomain) = config.subdomain {
                    self.subdomain = subdomain;
                }
                if let Some(domain) = config.domain {
                    self.custom_domain = Some(domain);
                }
                self.provisioning_status = ProvisioningStatus::InProgress;
            }
            // A run can fail before STORE_CONFIGURED moved the store to IN_PROGRESS.
            StoreAction::MarkProvisioningFailed => {
                if self.provisioning_status == ProvisioningStatus::Completed {
                    return Err(StoreError::InvalidTransition {
                        from: self.provisioning_status,
                        to: ProvisioningStatus::Failed,
                    });
                }
                self.provisioning_status = ProvisioningStatus::Failed;
            }
            StoreAction::MarkProvisioned => {
                self.transition(ProvisioningStatus::Completed)?;
                self.is_active = true;
            }
            StoreAction::CompleteOnboarding => {
                self.onboarding_status = OnboardingStatus::Completed;
                self.is_active = true;
            }
            StoreAction::ForceActivate => {
                self.is_active = true;
            }
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}

impl Store {
    fn transition(&mut self, to: ProvisioningStatus) -> Result<(), StoreError> {
        if !self.provisioning_status.can_transition_to(to) {
            return Err(StoreError::InvalidTransition {
                from: self.provisioning_status,
                to,
            });
        }
        self.provisioning_status = to;
        Ok(())
    }
}
