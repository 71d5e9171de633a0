//! # Merchant API
//!
//! The operations behind the merchant and admin endpoints, with the status code and
//! JSON body each error maps to.
//!
//! | Endpoint | Operation |
//! |---|---|
//! | `POST /provisioning/merchants/{id}/activate` | [`MerchantApi::activate`] |
//! | `GET /merchants/{id}/provisioning-status` | [`MerchantApi::provisioning_status`] |
//! | `POST /merchants/{id}/retry-provisioning` | [`MerchantApi::retry`] |
//! | `GET /onboarding` | [`MerchantApi::get_onboarding`] |
//! | `PUT /onboarding/steps/{step_key}` | [`MerchantApi::put_onboarding_step`] |
//! | `POST /onboarding/submit` | [`MerchantApi::submit_onboarding`] |
//! | `POST /admin/stores/{id}/activate` | [`MerchantApi::force_activate`] |
//! | `GET /admin/provisioning` | [`MerchantApi::list_provisioning`] |
//! | `GET /admin/onboarding/funnel` | [`MerchantApi::onboarding_funnel`] |

use crate::clients::StoreClient;
use crate::model::{MerchantProvisioning, ProvisioningConfig, ProvisioningStatus, Store, StoreId};
use crate::onboarding::{
    FunnelStage, OnboardingError, OnboardingService, OnboardingSubject, OnboardingView,
};
use crate::provisioning::{ProvisioningError, ProvisioningOrchestrator, ProvisioningSummary};
use crate::store_actor::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Body of the activation request.
pub type ActivationRequest = ProvisioningConfig;

/// Body of a wizard step save.
#[derive(Debug, Clone, Deserialize)]
pub struct StepRequest {
    pub data: serde_json::Value,
    /// Save even with required fields missing; the step stays incomplete.
    #[serde(default)]
    pub partial: bool,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    #[error(transparent)]
    Onboarding(#[from] OnboardingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Provisioning(e) => match e {
                ProvisioningError::StoreNotFound(_) | ProvisioningError::ProvisioningNotFound(_) => 404,
                ProvisioningError::AlreadyProvisioned(_)
                | ProvisioningError::ProvisioningInProgress(_)
                | ProvisioningError::NotRetryable { .. }
                | ProvisioningError::SubdomainTaken(_) => 409,
                ProvisioningError::MissingConfiguration(_) => 422,
                // Raised by a pipeline step after the run started.
                ProvisioningError::ThemeNotFound(_)
                | ProvisioningError::PlanNotFound(_)
                | ProvisioningError::Cancelled { .. }
                | ProvisioningError::Failure { .. }
                | ProvisioningError::Record(_) => 500,
            },
            ApiError::Onboarding(e) => match e {
                OnboardingError::InvalidStep(_)
                | OnboardingError::Validation { .. }
                | OnboardingError::MalformedData { .. } => 400,
                OnboardingError::StoreNotFound(_) => 404,
                OnboardingError::OutOfOrder { .. } => 409,
                OnboardingError::Prerequisite(_) | OnboardingError::Incomplete(_) => 422,
                OnboardingError::Record(_) => 500,
            },
            ApiError::Store(e) => match e {
                StoreError::NotFound(_) | StoreError::PlanNotFound(_) => 404,
                StoreError::SubdomainTaken(_)
                | StoreError::AlreadyProvisioned
                | StoreError::InvalidTransition { .. } => 409,
                StoreError::ActorCommunicationError(_) => 500,
            },
        }
    }

    /// JSON error body. Validation errors list the missing fields.
    pub fn body(&self) -> serde_json::Value {
        let mut body = json!({
            "status": self.status_code(),
            "message": self.to_string(),
        });
        match self {
            ApiError::Onboarding(OnboardingError::Validation { step, missing }) => {
                body["step"] = json!(step);
                body["missing"] = json!(missing);
            }
            ApiError::Onboarding(OnboardingError::Incomplete(missing)) => {
                body["missing"] = json!(missing);
            }
            ApiError::Onboarding(OnboardingError::OutOfOrder { current_step, .. }) => {
                body["currentStep"] = json!(current_step);
            }
            ApiError::Provisioning(ProvisioningError::Failure { step, .. })
            | ApiError::Provisioning(ProvisioningError::Cancelled { step }) => {
                body["step"] = json!(step);
            }
            _ => {}
        }
        body
    }
}

#[derive(Debug, Serialize)]
pub struct ActivationResponse {
    pub store: Store,
    pub provisioning: MerchantProvisioning,
}

#[derive(Clone)]
pub struct MerchantApi {
    stores: StoreClient,
    orchestrator: ProvisioningOrchestrator,
    onboarding: OnboardingService,
    shutdown: CancellationToken,
}

impl MerchantApi {
    pub fn new(
        stores: StoreClient,
        orchestrator: ProvisioningOrchestrator,
        onboarding: OnboardingService,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            stores,
            orchestrator,
            onboarding,
            shutdown,
        }
    }

    /// Activates a store: runs the provisioning pipeline to completion.
    #[instrument(skip(self, request))]
    pub async fn activate(
        &self,
        store_id: StoreId,
        request: ActivationRequest,
    ) -> Result<ActivationResponse, ApiError> {
        let store = self.stores.fetch(store_id).await?;
        if store.provisioning_status == ProvisioningStatus::Completed {
            return Err(ProvisioningError::AlreadyProvisioned(store_id).into());
        }

        let provisioning = self
            .orchestrator
            .provision_merchant(store_id, request, &self.shutdown.child_token())
            .await?;
        let store = self.stores.fetch(store_id).await?;
        info!(store_id = %store_id, "Store activated");
        Ok(ActivationResponse {
            store,
            provisioning,
        })
    }

    pub async fn provisioning_status(
        &self,
        store_id: StoreId,
    ) -> Result<MerchantProvisioning, ApiError> {
        Ok(self.orchestrator.provisioning_status(store_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn retry(&self, store_id: StoreId) -> Result<MerchantProvisioning, ApiError> {
        Ok(self
            .orchestrator
            .retry_provisioning(store_id, &self.shutdown.child_token())
            .await?)
    }

    pub async fn get_onboarding(
        &self,
        subject: OnboardingSubject,
    ) -> Result<OnboardingView, ApiError> {
        Ok(self.onboarding.get(subject).await?)
    }

    pub async fn put_onboarding_step(
        &self,
        subject: OnboardingSubject,
        step_key: &str,
        request: StepRequest,
    ) -> Result<OnboardingView, ApiError> {
        Ok(self
            .onboarding
            .submit_step(subject, step_key, request.data, request.partial)
            .await?)
    }

    pub async fn submit_onboarding(
        &self,
        subject: OnboardingSubject,
    ) -> Result<OnboardingView, ApiError> {
        Ok(self.onboarding.submit(subject).await?)
    }

    /// Admin: makes a store live without provisioning.
    #[instrument(skip(self))]
    pub async fn force_activate(&self, store_id: StoreId) -> Result<Store, ApiError> {
        Ok(self.stores.force_activate(store_id).await?)
    }

    pub async fn list_provisioning(&self) -> Result<Vec<ProvisioningSummary>, ApiError> {
        Ok(self.orchestrator.list_provisioning().await?)
    }

    pub async fn onboarding_funnel(&self) -> Result<Vec<FunnelStage>, ApiError> {
        Ok(self.onboarding.funnel().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProvisioningStep, StepKey};
    use crate::provisioning::AdapterError;
    use std::collections::BTreeMap;

    #[test]
    fn test_status_codes() {
        let cases: Vec<(ApiError, u16)> = vec![
            (ProvisioningError::StoreNotFound(StoreId(1)).into(), 404),
            (ProvisioningError::ProvisioningInProgress(StoreId(1)).into(), 409),
            (ProvisioningError::AlreadyProvisioned(StoreId(1)).into(), 409),
            (
                ProvisioningError::Failure {
                    step: ProvisioningStep::CredentialsSent,
                    source: AdapterError::Delivery("smtp down".into()),
                }
                .into(),
                500,
            ),
            (OnboardingError::InvalidStep("NOPE".into()).into(), 400),
            (
                OnboardingError::OutOfOrder {
                    step: StepKey::MarketingIntent,
                    current_step: 1,
                }
                .into(),
                409,
            ),
            (OnboardingError::Incomplete(BTreeMap::new()).into(), 422),
            (StoreError::NotFound("store_9".into()).into(), 404),
        ];
        for (error, code) in cases {
            assert_eq!(error.status_code(), code, "{error}");
        }
    }

    #[test]
    fn test_validation_body_lists_missing_fields() {
        let error: ApiError = OnboardingError::Validation {
            step: StepKey::BusinessDetails,
            missing: vec!["contactEmail", "contactPhone"],
        }
        .into();
        let body = error.body();
        assert_eq!(body["status"], 400);
        assert_eq!(body["step"], "BUSINESS_DETAILS");
        assert_eq!(body["missing"], json!(["contactEmail", "contactPhone"]));
    }

    #[test]
    fn test_step_request_defaults_to_full_save() {
        let request: StepRequest =
            serde_json::from_value(json!({ "data": { "brandName": "Acme" } })).unwrap();
        assert!(!request.partial);
    }
}
