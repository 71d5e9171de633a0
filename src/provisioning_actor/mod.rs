//! Provisioning progress rows, one per store, keyed by [`StoreId`](crate::model::StoreId).

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::ProvisioningClient;
use crate::framework::ResourceActor;
use crate::model::MerchantProvisioning;

/// Creates a new MerchantProvisioning actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<MerchantProvisioning>, ProvisioningClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, ProvisioningClient::new(generic_client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ErrorLog, ProvisioningStatus, ProvisioningStep, StoreId};
    use chrono::Utc;

    fn spawn() -> ProvisioningClient {
        let (actor, client) = new(8);
        tokio::spawn(actor.run(()));
        client
    }

    fn error_log() -> ErrorLog {
        ErrorLog {
            message: "boom".to_string(),
            step: Some(ProvisioningStep::WorkspaceCreated),
            stack: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_second_claim_is_refused() {
        let client = spawn();
        let id = StoreId(1);
        client.ensure(id, None).await.unwrap();

        let claimed = client.begin_run(id).await.unwrap();
        assert_eq!(claimed.status, ProvisioningStatus::InProgress);
        assert!(claimed.started_at.is_some());

        let second = client.begin_run(id).await;
        assert_eq!(second, Err(ProvisioningRecordError::InProgress(id)));
    }

    #[tokio::test]
    async fn test_checkpoints_only_move_forward() {
        let client = spawn();
        let id = StoreId(1);
        client.ensure(id, None).await.unwrap();
        client.begin_run(id).await.unwrap();

        let row = client
            .record_checkpoint(id, ProvisioningStep::StoreConfigured)
            .await
            .unwrap();
        assert_eq!(row.completion_percent, 10);
        let row = client
            .record_checkpoint(id, ProvisioningStep::WorkspaceCreated)
            .await
            .unwrap();
        assert!(row.workspace_created);
        assert_eq!(row.completion_percent, 25);

        let back = client
            .record_checkpoint(id, ProvisioningStep::StoreConfigured)
            .await;
        assert!(matches!(back, Err(ProvisioningRecordError::CheckpointRegression { .. })));
    }

    #[tokio::test]
    async fn test_failed_run_can_be_claimed_again() {
        let client = spawn();
        let id = StoreId(1);
        client.ensure(id, None).await.unwrap();
        client.begin_run(id).await.unwrap();
        client
            .record_checkpoint(id, ProvisioningStep::WorkspaceCreated)
            .await
            .unwrap();
        client.fail(id, error_log()).await.unwrap();

        let rerun = client.begin_run(id).await.unwrap();
        assert_eq!(rerun.status, ProvisioningStatus::InProgress);
        assert_eq!(rerun.completion_percent, 0);
        assert!(!rerun.workspace_created);
        assert!(rerun.error_log.is_none());
        assert_eq!(rerun.error_history.len(), 1);
        assert_eq!(rerun.retry_count, 0);

        assert_eq!(
            client.begin_run(id).await,
            Err(ProvisioningRecordError::InProgress(id))
        );
    }

    #[tokio::test]
    async fn test_retry_only_from_failed() {
        let client = spawn();
        let id = StoreId(1);
        client.ensure(id, None).await.unwrap();

        let refused = client.reset_for_retry(id).await;
        assert_eq!(
            refused,
            Err(ProvisioningRecordError::NotRetryable {
                store_id: id,
                status: ProvisioningStatus::Pending
            })
        );

        client.begin_run(id).await.unwrap();
        client.fail(id, error_log()).await.unwrap();

        let reset = client.reset_for_retry(id).await.unwrap();
        assert_eq!(reset.status, ProvisioningStatus::Pending);
        assert_eq!(reset.retry_count, 1);

        // The next run starts from zero and archives the previous error.
        let rerun = client.begin_run(id).await.unwrap();
        assert_eq!(rerun.completion_percent, 0);
        assert!(rerun.error_log.is_none());
        assert_eq!(rerun.error_history.len(), 1);
    }

    #[tokio::test]
    async fn test_completed_is_terminal() {
        let client = spawn();
        let id = StoreId(1);
        client.ensure(id, None).await.unwrap();
        client.begin_run(id).await.unwrap();
        let done = client.complete(id).await.unwrap();
        assert_eq!(done.completion_percent, 100);
        assert!(done.completed_at.is_some());

        assert_eq!(
            client.begin_run(id).await,
            Err(ProvisioningRecordError::AlreadyCompleted(id))
        );
        assert!(matches!(
            client.fail(id, error_log()).await,
            Err(ProvisioningRecordError::InvalidTransition { .. })
        ));
    }
}
