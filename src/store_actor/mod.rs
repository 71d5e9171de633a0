//! Store-specific resource logic: subdomain uniqueness and activation transitions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::StoreClient;
use crate::framework::ResourceActor;
use crate::model::{Store, StoreId};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Creates a new Store actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Store>, StoreClient) {
    let store_id_counter = Arc::new(AtomicU32::new(1));
    let next_store_id = move || StoreId(store_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::with_id_generator(buffer_size, next_store_id);
    let client = StoreClient::new(generic_client);

    (actor, client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::PlanClient;
    use crate::framework::mock::MockClient;
    use crate::model::{OwnerId, Plan, PlanId, ProvisioningConfig, StoreCreate, ThemeId};

    fn params(subdomain: &str) -> StoreCreate {
        StoreCreate {
            owner_id: OwnerId::new("user_1"),
            owner_email: "owner@acme.test".to_string(),
            name: "Acme".to_string(),
            subdomain: subdomain.to_string(),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_subdomain_is_unique() {
        let plans = MockClient::<Plan>::new();
        let (actor, client) = new(8);
        tokio::spawn(actor.run(PlanClient::new(plans.client())));

        client.create_store(params("acme")).await.unwrap();
        let dup = client.create_store(params("acme")).await;
        assert_eq!(dup, Err(StoreError::SubdomainTaken("acme".to_string())));
    }

    #[tokio::test]
    async fn test_unknown_plan_leaves_store_untouched() {
        let mut plans = MockClient::<Plan>::new();
        plans.expect_get().return_ok(None);
        let (actor, client) = new(8);
        tokio::spawn(actor.run(PlanClient::new(plans.client())));

        let id = client.create_store(params("acme")).await.unwrap();
        let config = ProvisioningConfig {
            theme_id: ThemeId::new("minimal"),
            plan_id: PlanId::new("gold"),
            subdomain: None,
            domain: None,
            category: "fashion".to_string(),
            integrations: vec![],
        };
        let result = client.apply_provisioning_config(id, config).await;
        assert_eq!(result, Err(StoreError::PlanNotFound(PlanId::new("gold"))));

        let store = client.fetch(id).await.unwrap();
        assert!(store.theme_id.is_none());
        assert_eq!(store.provisioning_status, crate::model::ProvisioningStatus::Pending);
        plans.verify();
    }

    #[tokio::test]
    async fn test_failed_store_cannot_complete_directly() {
        let plans = MockClient::<Plan>::new();
        let (actor, client) = new(8);
        tokio::spawn(actor.run(PlanClient::new(plans.client())));

        let id = client.create_store(params("acme")).await.unwrap();
        let result = client.mark_provisioned(id).await;
        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
        assert!(!client.fetch(id).await.unwrap().is_active);

        let activated = client.force_activate(id).await.unwrap();
        assert!(activated.is_active);
    }
}
