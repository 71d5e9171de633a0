//! Errors of the provisioning pipeline and its adapters.

use crate::catalog_actor::CatalogError;
use crate::deployment_actor::DeploymentError;
use crate::model::{PlanId, ProvisioningStatus, ProvisioningStep, StoreId, ThemeId};
use crate::onboarding_actor::OnboardingRecordError;
use crate::provisioning_actor::ProvisioningRecordError;
use crate::settings_actor::SettingsError;
use crate::store_actor::StoreError;
use thiserror::Error;

/// Failure reported by a deployment target or the notification channel.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdapterError {
    #[error("Theme not found: {0}")]
    ThemeNotFound(ThemeId),

    #[error("Deployment target unavailable: {0}")]
    Unavailable(String),

    #[error("Email delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("Store not found: {0}")]
    StoreNotFound(StoreId),

    #[error("No provisioning record for store {0}")]
    ProvisioningNotFound(StoreId),

    #[error("Theme not found: {0}")]
    ThemeNotFound(ThemeId),

    #[error("Plan not found: {0}")]
    PlanNotFound(PlanId),

    #[error("Store {0} is already provisioned")]
    AlreadyProvisioned(StoreId),

    #[error("Provisioning already in progress for store {0}")]
    ProvisioningInProgress(StoreId),

    #[error("Provisioning for store {store_id} is {status}; only FAILED runs can be retried")]
    NotRetryable {
        store_id: StoreId,
        status: ProvisioningStatus,
    },

    #[error("Subdomain already taken: {0}")]
    SubdomainTaken(String),

    #[error("Store {0} has no provisioning configuration to retry with")]
    MissingConfiguration(StoreId),

    #[error("Provisioning cancelled before {step}")]
    Cancelled { step: ProvisioningStep },

    #[error("Provisioning step {step} failed: {source}")]
    Failure {
        step: ProvisioningStep,
        #[source]
        source: AdapterError,
    },

    #[error("Record store error: {0}")]
    Record(String),
}

impl ProvisioningError {
    /// Wraps an adapter failure, keeping `ThemeNotFound` as its own variant.
    pub fn adapter(step: ProvisioningStep, source: AdapterError) -> Self {
        match source {
            AdapterError::ThemeNotFound(theme_id) => ProvisioningError::ThemeNotFound(theme_id),
            source => ProvisioningError::Failure { step, source },
        }
    }
}

impl From<StoreError> for ProvisioningError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::SubdomainTaken(subdomain) => ProvisioningError::SubdomainTaken(subdomain),
            StoreError::PlanNotFound(plan_id) => ProvisioningError::PlanNotFound(plan_id),
            other => ProvisioningError::Record(other.to_string()),
        }
    }
}

impl From<ProvisioningRecordError> for ProvisioningError {
    fn from(e: ProvisioningRecordError) -> Self {
        match e {
            ProvisioningRecordError::AlreadyCompleted(id) => ProvisioningError::AlreadyProvisioned(id),
            ProvisioningRecordError::InProgress(id) => ProvisioningError::ProvisioningInProgress(id),
            ProvisioningRecordError::NotRetryable { store_id, status } => {
                ProvisioningError::NotRetryable { store_id, status }
            }
            other => ProvisioningError::Record(other.to_string()),
        }
    }
}

impl From<DeploymentError> for ProvisioningError {
    fn from(e: DeploymentError) -> Self {
        ProvisioningError::Record(e.to_string())
    }
}

impl From<SettingsError> for ProvisioningError {
    fn from(e: SettingsError) -> Self {
        ProvisioningError::Record(e.to_string())
    }
}

impl From<CatalogError> for ProvisioningError {
    fn from(e: CatalogError) -> Self {
        ProvisioningError::Record(e.to_string())
    }
}

impl From<OnboardingRecordError> for ProvisioningError {
    fn from(e: OnboardingRecordError) -> Self {
        ProvisioningError::Record(e.to_string())
    }
}
