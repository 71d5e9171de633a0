use crate::model::{MissingFields, StepKey};
use crate::onboarding_actor::OnboardingRecordError;
use crate::settings_actor::SettingsError;
use crate::store_actor::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OnboardingError {
    #[error("Unknown onboarding step: {0}")]
    InvalidStep(String),

    #[error("Step {step} is missing required fields: {}", .missing.join(", "))]
    Validation {
        step: StepKey,
        missing: Vec<&'static str>,
    },

    #[error("Step {step} data is malformed: {reason}")]
    MalformedData { step: StepKey, reason: String },

    #[error("Step {step} is out of order; complete step {} first", .current_step + 1)]
    OutOfOrder { step: StepKey, current_step: u8 },

    #[error("{0}")]
    Prerequisite(String),

    #[error("Onboarding is incomplete")]
    Incomplete(MissingFields),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Record store error: {0}")]
    Record(String),
}

impl From<OnboardingRecordError> for OnboardingError {
    fn from(e: OnboardingRecordError) -> Self {
        match e {
            OnboardingRecordError::OutOfOrder { step, current_step } => {
                OnboardingError::OutOfOrder { step, current_step }
            }
            OnboardingRecordError::Incomplete(missing) => OnboardingError::Incomplete(missing),
            other => OnboardingError::Record(other.to_string()),
        }
    }
}

impl From<StoreError> for OnboardingError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => OnboardingError::StoreNotFound(id),
            other => OnboardingError::Record(other.to_string()),
        }
    }
}

impl From<SettingsError> for OnboardingError {
    fn from(e: SettingsError) -> Self {
        OnboardingError::Record(e.to_string())
    }
}
