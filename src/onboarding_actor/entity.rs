//! [`ActorEntity`] implementations for [`BrandOnboarding`] and [`BrandOnboardingStep`].

use super::{OnboardingAction, OnboardingActionResult, OnboardingRecordError};
use crate::framework::ActorEntity;
use crate::model::{
    BrandOnboarding, BrandOnboardingStep, OnboardingSeed, OnboardingStatus, StepRowId,
    StepRowStatus, StoreId,
};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for BrandOnboarding {
    type Id = StoreId;
    type Create = OnboardingSeed;
    type Update = OnboardingSeed;
    type Action = OnboardingAction;
    type ActionResult = OnboardingActionResult;
    type Context = ();
    type Error = OnboardingRecordError;

    fn from_create_params(id: StoreId, params: OnboardingSeed) -> Result<Self, OnboardingRecordError> {
        Ok(Self::new(id, params.category))
    }

    /// Seeding an existing record only fills a missing category hint.
    async fn on_update(&mut self, update: OnboardingSeed, _ctx: &()) -> Result<(), OnboardingRecordError> {
        if self.category.is_none() {
            self.category = update.category;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OnboardingAction,
        _ctx: &(),
    ) -> Result<OnboardingActionResult, OnboardingRecordError> {
        match action {
            OnboardingAction::SaveStep(submission) => {
                let step = submission.key();
                if !self.allows(step) {
                    return Err(OnboardingRecordError::OutOfOrder {
                        step,
                        current_step: self.current_step,
                    });
                }
                let complete = self.save_step(submission);
                Ok(OnboardingActionResult::SaveStep {
                    complete,
                    onboarding: self.clone(),
                })
            }
            OnboardingAction::MarkSubmitted => {
                let missing = self.missing();
                if !missing.is_empty() {
                    return Err(OnboardingRecordError::Incomplete(missing));
                }
                self.status = OnboardingStatus::Completed;
                self.completed_at.get_or_insert_with(Utc::now);
                Ok(OnboardingActionResult::MarkSubmitted(self.clone()))
            }
        }
    }
}

#[async_trait]
impl ActorEntity for BrandOnboardingStep {
    type Id = StepRowId;
    type Create = StepRowStatus;
    type Update = StepRowStatus;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = OnboardingRecordError;

    fn from_create_params(id: StepRowId, status: StepRowStatus) -> Result<Self, OnboardingRecordError> {
        let now = Utc::now();
        Ok(Self {
            id,
            status,
            completed_at: (status == StepRowStatus::Completed).then_some(now),
            updated_at: now,
        })
    }

    async fn on_update(&mut self, status: StepRowStatus, _ctx: &()) -> Result<(), OnboardingRecordError> {
        let now = Utc::now();
        match status {
            StepRowStatus::Completed => {
                self.completed_at.get_or_insert(now);
            }
            StepRowStatus::Pending => self.completed_at = None,
        }
        self.status = status;
        self.updated_at = now;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), OnboardingRecordError> {
        Ok(())
    }
}
