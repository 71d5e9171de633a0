//! [`ActorEntity`] implementation for [`MerchantProvisioning`].
//!
//! Status moves `{PENDING | FAILED} -> IN_PROGRESS -> {COMPLETED | FAILED}`. A new run
//! archives the previous error log. [`ProvisioningAction::ResetForRetry`] moves
//! `FAILED -> PENDING` and counts the retry. Checkpoints only move forward within a run.

use super::{ProvisioningAction, ProvisioningRecordError};
use crate::framework::ActorEntity;
use crate::model::{
    MerchantProvisioning, ProvisioningRequest, ProvisioningStatus, ProvisioningStep, StoreId,
};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for MerchantProvisioning {
    type Id = StoreId;
    type Create = ProvisioningRequest;
    type Update = ProvisioningRequest;
    type Action = ProvisioningAction;
    type ActionResult = MerchantProvisioning;
    type Context = ();
    type Error = ProvisioningRecordError;

    fn from_create_params(
        id: StoreId,
        params: ProvisioningRequest,
    ) -> Result<Self, ProvisioningRecordError> {
        Ok(Self::new(id, params.requested_config))
    }

    /// Refreshes the config snapshot; the run state is only changed through actions.
    async fn on_update(
        &mut self,
        update: ProvisioningRequest,
        _ctx: &(),
    ) -> Result<(), ProvisioningRecordError> {
        if let Some(config) = update.requested_config {
            self.requested_config = Some(config);
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProvisioningAction,
        _ctx: &(),
    ) -> Result<MerchantProvisioning, ProvisioningRecordError> {
        let now = Utc::now();
        match action {
            ProvisioningAction::BeginRun => {
                match self.status {
                    ProvisioningStatus::Pending | ProvisioningStatus::Failed => {}
                    ProvisioningStatus::InProgress => {
                        return Err(ProvisioningRecordError::InProgress(self.store_id))
                    }
                    ProvisioningStatus::Completed => {
                        return Err(ProvisioningRecordError::AlreadyCompleted(self.store_id))
                    }
                }
                self.status = ProvisioningStatus::InProgress;
                if let Some(previous) = self.error_log.take() {
                    self.error_history.push(previous);
                }
                self.current_step = None;
                self.completion_percent = 0;
                self.workspace_created = false;
                self.dashboard_created = false;
                self.website_deployed = false;
                self.data_initialized = false;
                self.credentials_sent = false;
                self.started_at = Some(now);
                self.completed_at = None;
            }
            ProvisioningAction::RecordCheckpoint(step) => {
                self.require(ProvisioningStatus::InProgress, ProvisioningStatus::InProgress)?;
                self.advance(step)?;
            }
            ProvisioningAction::Complete => {
                self.require(ProvisioningStatus::InProgress, ProvisioningStatus::Completed)?;
                self.advance(ProvisioningStep::Completed)?;
                self.status = ProvisioningStatus::Completed;
                self.completed_at = Some(now);
            }
            ProvisioningAction::Fail(error_log) => {
                self.require(ProvisioningStatus::InProgress, ProvisioningStatus::Failed)?;
                self.status = ProvisioningStatus::Failed;
                self.error_log = Some(error_log);
            }
            ProvisioningAction::ResetForRetry => {
                if self.status != ProvisioningStatus::Failed {
                    return Err(ProvisioningRecordError::NotRetryable {
                        store_id: self.store_id,
                        status: self.status,
                    });
                }
                self.status = ProvisioningStatus::Pending;
                self.retry_count += 1;
            }
        }
        self.updated_at = now;
        Ok(self.clone())
    }
}

impl MerchantProvisioning {
    fn require(
        &self,
        expected: ProvisioningStatus,
        to: ProvisioningStatus,
    ) -> Result<(), ProvisioningRecordError> {
        if self.status != expected {
            return Err(ProvisioningRecordError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }

    fn advance(&mut self, step: ProvisioningStep) -> Result<(), ProvisioningRecordError> {
        if self.current_step.is_some_and(|current| current >= step) {
            return Err(ProvisioningRecordError::CheckpointRegression {
                current: self.current_step,
                attempted: step,
            });
        }
        self.current_step = Some(step);
        self.completion_percent = step.checkpoint_percent();
        match step {
            ProvisioningStep::WorkspaceCreated => self.workspace_created = true,
            ProvisioningStep::DashboardCreated => self.dashboard_created = true,
            ProvisioningStep::WebsiteDeployed => self.website_deployed = true,
            ProvisioningStep::DataInitialized => self.data_initialized = true,
            ProvisioningStep::CredentialsSent => self.credentials_sent = true,
            _ => {}
        }
        Ok(())
    }
}
