use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{
    BrandOnboarding, BrandOnboardingStep, OnboardingSeed, StepRowId, StepRowStatus,
    StepSubmission, StoreId,
};
use crate::onboarding_actor::{OnboardingAction, OnboardingActionResult, OnboardingRecordError};
use async_trait::async_trait;
use tracing::{debug, instrument};

fn map_onboarding_error(e: FrameworkError) -> OnboardingRecordError {
    match e.into_entity_error::<OnboardingRecordError>() {
        Ok(err) => err,
        Err(FrameworkError::NotFound(id)) => OnboardingRecordError::NotFound(id),
        Err(other) => OnboardingRecordError::ActorCommunicationError(other.to_string()),
    }
}

fn unexpected_result(result: OnboardingActionResult) -> OnboardingRecordError {
    OnboardingRecordError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

/// Client for the BrandOnboarding actor.
#[derive(Clone)]
pub struct OnboardingClient {
    inner: ResourceClient<BrandOnboarding>,
}

impl OnboardingClient {
    pub fn new(inner: ResourceClient<BrandOnboarding>) -> Self {
        Self { inner }
    }

    /// Creates the onboarding skeleton if absent.
    #[instrument(skip(self))]
    pub async fn ensure(
        &self,
        id: StoreId,
        category: Option<String>,
    ) -> Result<BrandOnboarding, OnboardingRecordError> {
        debug!("Sending request");
        let seed = OnboardingSeed { category };
        self.inner
            .upsert(id, seed.clone(), seed)
            .await
            .map_err(Self::map_error)
    }

    pub async fn fetch(&self, id: StoreId) -> Result<BrandOnboarding, OnboardingRecordError> {
        self.get(id)
            .await?
            .ok_or_else(|| OnboardingRecordError::NotFound(id.to_string()))
    }

    /// Saves one step. Returns whether the step is complete, and the updated record.
    #[instrument(skip(self, submission), fields(step = %submission.key()))]
    pub async fn save_step(
        &self,
        id: StoreId,
        submission: StepSubmission,
    ) -> Result<(bool, BrandOnboarding), OnboardingRecordError> {
        debug!("Sending action");
        match self
            .inner
            .perform_action(id, OnboardingAction::SaveStep(submission))
            .await
            .map_err(Self::map_error)?
        {
            OnboardingActionResult::SaveStep { complete, onboarding } => Ok((complete, onboarding)),
            other => Err(unexpected_result(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn mark_submitted(&self, id: StoreId) -> Result<BrandOnboarding, OnboardingRecordError> {
        debug!("Sending action");
        match self
            .inner
            .perform_action(id, OnboardingAction::MarkSubmitted)
            .await
            .map_err(Self::map_error)?
        {
            OnboardingActionResult::MarkSubmitted(onboarding) => Ok(onboarding),
            other => Err(unexpected_result(other)),
        }
    }
}

#[async_trait]
impl ActorClient<BrandOnboarding> for OnboardingClient {
    type Error = OnboardingRecordError;

    fn inner(&self) -> &ResourceClient<BrandOnboarding> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_onboarding_error(e)
    }
}

/// Client for the per-step analytics rows.
#[derive(Clone)]
pub struct StepRowClient {
    inner: ResourceClient<BrandOnboardingStep>,
}

impl StepRowClient {
    pub fn new(inner: ResourceClient<BrandOnboardingStep>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn record(
        &self,
        id: StepRowId,
        status: StepRowStatus,
    ) -> Result<BrandOnboardingStep, OnboardingRecordError> {
        debug!("Sending request");
        self.inner
            .upsert(id, status, status)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<BrandOnboardingStep> for StepRowClient {
    type Error = OnboardingRecordError;

    fn inner(&self) -> &ResourceClient<BrandOnboardingStep> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_onboarding_error(e)
    }
}
