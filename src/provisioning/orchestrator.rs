//! # Provisioning Orchestrator
//!
//! Runs the fixed eight-step pipeline for one store:
//!
//! | Step | % |
//! |---|---|
//! | STORE_CONFIGURED | 10 |
//! | WORKSPACE_CREATED | 25 |
//! | DASHBOARD_CREATED | 40 |
//! | WEBSITE_DEPLOYED | 60 |
//! | CUSTOMIZATION_CREATED | 70 |
//! | DATA_INITIALIZED | 80 |
//! | CREDENTIALS_SENT | 95 |
//! | COMPLETED | 100 |
//!
//! Steps run one after another. The checkpoint of a step is persisted before the next
//! step starts, so the provisioning row always names the last step that finished.
//! The first error stops the run, is written to the row as FAILED together with the
//! store's status, and is returned unchanged.
//!
//! A run starts only after claiming the row (PENDING or FAILED -> IN_PROGRESS inside the record
//! actor), so two concurrent activations of a store cannot both run. Every step writes
//! through upserts, so a retry re-runs the whole pipeline without duplicating records.

use super::{ProvisioningAdapters, ProvisioningError, Workspace};
use crate::clients::TenantRecords;
use crate::framework::ActorClient;
use crate::model::{
    CustomizationDefaults, DeploymentCreate, DeploymentUpdate, ErrorLog, MerchantProvisioning,
    ProvisioningConfig, ProvisioningStatus, ProvisioningStep, Store, StoreId, Theme,
};
use crate::notification::Email;
use crate::store_actor::StoreError;
use serde::Serialize;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Admin view of one provisioning row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisioningSummary {
    pub store_id: StoreId,
    pub status: ProvisioningStatus,
    pub current_step: Option<ProvisioningStep>,
    pub completion_percent: u8,
    pub retry_count: u32,
    pub error_message: Option<String>,
}

impl From<&MerchantProvisioning> for ProvisioningSummary {
    fn from(row: &MerchantProvisioning) -> Self {
        Self {
            store_id: row.store_id,
            status: row.status,
            current_step: row.current_step,
            completion_percent: row.completion_percent,
            retry_count: row.retry_count,
            error_message: row.error_log.as_ref().map(|log| log.message.clone()),
        }
    }
}

/// An error tagged with the step that raised it.
struct StepFailure {
    step: ProvisioningStep,
    error: ProvisioningError,
}

#[derive(Clone)]
pub struct ProvisioningOrchestrator {
    records: TenantRecords,
    adapters: ProvisioningAdapters,
    notify_from: String,
}

impl ProvisioningOrchestrator {
    pub fn new(
        records: TenantRecords,
        adapters: ProvisioningAdapters,
        notify_from: impl Into<String>,
    ) -> Self {
        Self {
            records,
            adapters,
            notify_from: notify_from.into(),
        }
    }

    /// Provisions `store_id` from `config`.
    ///
    /// Refused without side effects when the store's row is IN_PROGRESS
    /// (`ProvisioningInProgress`) or COMPLETED (`AlreadyProvisioned`). A FAILED row starts
    /// a fresh run with `config`, which is how a bad configuration gets corrected.
    #[instrument(skip(self, config, cancel), fields(store_id = %store_id))]
    pub async fn provision_merchant(
        &self,
        store_id: StoreId,
        config: ProvisioningConfig,
        cancel: &CancellationToken,
    ) -> Result<MerchantProvisioning, ProvisioningError> {
        self.load_store(store_id).await?;
        self.records.provisioning.ensure(store_id, None).await?;
        self.records.provisioning.begin_run(store_id).await?;
        self.records
            .provisioning
            .ensure(store_id, Some(config.clone()))
            .await?;
        info!(theme_id = %config.theme_id, plan_id = %config.plan_id, "Provisioning run started");

        match self.run_pipeline(store_id, &config, cancel).await {
            Ok(row) => {
                info!(retry_count = row.retry_count, "Provisioning completed");
                Ok(row)
            }
            Err(failure) => {
                self.record_failure(store_id, &failure).await;
                Err(failure.error)
            }
        }
    }

    /// Restarts a FAILED run from the first step with the store's persisted
    /// configuration. Any other status is `NotRetryable` and nothing is written.
    #[instrument(skip(self, cancel), fields(store_id = %store_id))]
    pub async fn retry_provisioning(
        &self,
        store_id: StoreId,
        cancel: &CancellationToken,
    ) -> Result<MerchantProvisioning, ProvisioningError> {
        let row = self.provisioning_status(store_id).await?;
        if row.status != ProvisioningStatus::Failed {
            return Err(ProvisioningError::NotRetryable {
                store_id,
                status: row.status,
            });
        }
        let store = self.load_store(store_id).await?;
        let config = store
            .provisioning_config()
            .or(row.requested_config)
            .ok_or(ProvisioningError::MissingConfiguration(store_id))?;

        let reset = self.records.provisioning.reset_for_retry(store_id).await?;
        info!(retry_count = reset.retry_count, "Retrying provisioning");
        self.provision_merchant(store_id, config, cancel).await
    }

    pub async fn provisioning_status(
        &self,
        store_id: StoreId,
    ) -> Result<MerchantProvisioning, ProvisioningError> {
        self.records
            .provisioning
            .get(store_id)
            .await?
            .ok_or(ProvisioningError::ProvisioningNotFound(store_id))
    }

    pub async fn list_provisioning(&self) -> Result<Vec<ProvisioningSummary>, ProvisioningError> {
        let mut rows: Vec<ProvisioningSummary> = self
            .records
            .provisioning
            .list()
            .await?
            .iter()
            .map(ProvisioningSummary::from)
            .collect();
        rows.sort_by_key(|row| row.store_id);
        Ok(rows)
    }

    async fn run_pipeline(
        &self,
        id: StoreId,
        config: &ProvisioningConfig,
        cancel: &CancellationToken,
    ) -> Result<MerchantProvisioning, StepFailure> {
        use ProvisioningStep::*;

        let store = self
            .checkpoint(id, StoreConfigured, cancel, self.configure_store(id, config))
            .await?;
        let workspace = self
            .checkpoint(id, WorkspaceCreated, cancel, self.create_workspace(id))
            .await?;
        let dashboard_url = self
            .checkpoint(id, DashboardCreated, cancel, self.create_dashboard(id, &workspace))
            .await?;
        let (theme, website_url) = self
            .checkpoint(id, WebsiteDeployed, cancel, self.deploy_website(&store))
            .await?;
        self.checkpoint(id, CustomizationCreated, cancel, self.seed_customization(id, &theme))
            .await?;
        self.checkpoint(id, DataInitialized, cancel, self.initialize_data(&store))
            .await?;
        self.checkpoint(
            id,
            CredentialsSent,
            cancel,
            self.send_credentials(&store, &dashboard_url, &website_url),
        )
        .await?;
        self.checkpoint(id, Completed, cancel, self.complete(id)).await
    }

    /// Runs one step and persists its checkpoint. `COMPLETED` persists its own.
    async fn checkpoint<T>(
        &self,
        id: StoreId,
        step: ProvisioningStep,
        cancel: &CancellationToken,
        work: impl Future<Output = Result<T, ProvisioningError>>,
    ) -> Result<T, StepFailure> {
        if cancel.is_cancelled() {
            return Err(StepFailure {
                step,
                error: ProvisioningError::Cancelled { step },
            });
        }
        let value = work.await.map_err(|error| StepFailure { step, error })?;
        if step != ProvisioningStep::Completed {
            self.records
                .provisioning
                .record_checkpoint(id, step)
                .await
                .map_err(|e| StepFailure {
                    step,
                    error: e.into(),
                })?;
        }
        info!(%step, percent = step.checkpoint_percent(), "Checkpoint reached");
        Ok(value)
    }

    async fn configure_store(
        &self,
        id: StoreId,
        config: &ProvisioningConfig,
    ) -> Result<Store, ProvisioningError> {
        self.records
            .stores
            .apply_provisioning_config(id, config.clone())
            .await
            .map_err(|e| match e {
                StoreError::AlreadyProvisioned => ProvisioningError::AlreadyProvisioned(id),
                StoreError::NotFound(_) => ProvisioningError::StoreNotFound(id),
                other => other.into(),
            })
    }

    async fn create_workspace(&self, id: StoreId) -> Result<Workspace, ProvisioningError> {
        let workspace = self
            .adapters
            .workspaces
            .create_workspace(id)
            .await
            .map_err(|e| ProvisioningError::adapter(ProvisioningStep::WorkspaceCreated, e))?;
        self.records
            .deployments
            .upsert_workspace(
                id,
                DeploymentCreate {
                    merchant_id: workspace.merchant_id.clone(),
                    tenant_namespace: workspace.tenant_namespace.clone(),
                },
            )
            .await?;
        Ok(workspace)
    }

    async fn create_dashboard(
        &self,
        id: StoreId,
        workspace: &Workspace,
    ) -> Result<String, ProvisioningError> {
        let dashboard = self
            .adapters
            .dashboards
            .create_dashboard(id, &workspace.merchant_id)
            .await
            .map_err(|e| ProvisioningError::adapter(ProvisioningStep::DashboardCreated, e))?;
        self.records
            .deployments
            .update(
                id,
                DeploymentUpdate {
                    dashboard_url: Some(dashboard.url.clone()),
                    ..Default::default()
                },
            )
            .await?;
        Ok(dashboard.url)
    }

    async fn deploy_website(&self, store: &Store) -> Result<(Theme, String), ProvisioningError> {
        let theme_id = store
            .theme_id
            .clone()
            .ok_or_else(|| ProvisioningError::Record(format!("store {} has no theme", store.id)))?;
        let theme = self
            .records
            .themes
            .get(theme_id.clone())
            .await?
            .ok_or_else(|| ProvisioningError::ThemeNotFound(theme_id.clone()))?;

        let deployment = self
            .adapters
            .websites
            .deploy_website(store.id, &theme_id, &store.subdomain, store.custom_domain.as_deref())
            .await
            .map_err(|e| ProvisioningError::adapter(ProvisioningStep::WebsiteDeployed, e))?;

        let mut config_patch = serde_json::Map::new();
        config_patch.insert("themeId".to_string(), serde_json::json!(theme_id));
        config_patch.insert("subdomain".to_string(), serde_json::json!(store.subdomain));
        config_patch.insert(
            "integrations".to_string(),
            serde_json::json!(store.integrations),
        );
        self.records
            .deployments
            .update(
                store.id,
                DeploymentUpdate {
                    website_url: Some(deployment.url.clone()),
                    theme_slug: Some(deployment.theme_slug),
                    config_patch: Some(config_patch),
                    ..Default::default()
                },
            )
            .await?;
        Ok((theme, deployment.url))
    }

    async fn seed_customization(&self, id: StoreId, theme: &Theme) -> Result<(), ProvisioningError> {
        self.records
            .customizations
            .seed(
                id,
                CustomizationDefaults {
                    theme_id: theme.id.clone(),
                    document: theme.default_customization.clone(),
                },
            )
            .await?;
        Ok(())
    }

    async fn initialize_data(&self, store: &Store) -> Result<(), ProvisioningError> {
        self.records.settings.ensure_defaults(store.id).await?;
        self.records
            .onboarding
            .ensure(store.id, store.category.clone())
            .await?;
        Ok(())
    }

    async fn send_credentials(
        &self,
        store: &Store,
        dashboard_url: &str,
        website_url: &str,
    ) -> Result<(), ProvisioningError> {
        let email = Email::store_ready(
            &self.notify_from,
            &store.owner_email,
            &store.name,
            dashboard_url,
            website_url,
        );
        self.adapters
            .notifier
            .send_email(email)
            .await
            .map_err(|e| ProvisioningError::adapter(ProvisioningStep::CredentialsSent, e))
    }

    /// The row completes first so a store is never live behind a FAILED row.
    async fn complete(&self, id: StoreId) -> Result<MerchantProvisioning, ProvisioningError> {
        let row = self.records.provisioning.complete(id).await?;
        self.records.stores.mark_provisioned(id).await?;
        Ok(row)
    }

    async fn record_failure(&self, store_id: StoreId, failure: &StepFailure) {
        let error_log = ErrorLog::capture(Some(failure.step), &failure.error);
        error!(step = %failure.step, error = %failure.error, "Provisioning failed");

        if let Err(e) = self.records.provisioning.fail(store_id, error_log).await {
            warn!(error = %e, "Could not mark provisioning row FAILED");
        }
        if let Err(e) = self.records.stores.mark_provisioning_failed(store_id).await {
            warn!(error = %e, "Could not mark store FAILED");
        }
    }

    async fn load_store(&self, store_id: StoreId) -> Result<Store, ProvisioningError> {
        self.records
            .stores
            .get(store_id)
            .await?
            .ok_or(ProvisioningError::StoreNotFound(store_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ProvisioningClient;
    use crate::config::PlatformConfig;
    use crate::framework::mock::MockClient;
    use crate::framework::FrameworkError;
    use crate::model::{OwnerId, PlanCreate, PlanId, StoreCreate, ThemeId};
    use crate::provisioning_actor::ProvisioningRecordError;
    use crate::{catalog_actor, deployment_actor, onboarding_actor, settings_actor, store_actor};

    /// Real record actors for everything except the provisioning rows.
    fn records_with(provisioning: ProvisioningClient) -> TenantRecords {
        let (theme_actor, themes) = catalog_actor::new_themes(8);
        let (plan_actor, plans) = catalog_actor::new_plans(8);
        let (store_actor, stores) = store_actor::new(8);
        let (deployment_actor, deployments) = deployment_actor::new(8);
        let (settings_actor, settings) = settings_actor::new(8);
        let (customization_actor, customizations) = settings_actor::new_customizations(8);
        let (onboarding_actor, onboarding) = onboarding_actor::new(8);
        let (step_row_actor, step_rows) = onboarding_actor::new_step_rows(8);

        tokio::spawn(theme_actor.run(()));
        tokio::spawn(plan_actor.run(()));
        tokio::spawn(store_actor.run(plans.clone()));
        tokio::spawn(deployment_actor.run(()));
        tokio::spawn(settings_actor.run(()));
        tokio::spawn(customization_actor.run(()));
        tokio::spawn(onboarding_actor.run(()));
        tokio::spawn(step_row_actor.run(()));

        TenantRecords {
            stores,
            provisioning,
            deployments,
            settings,
            customizations,
            onboarding,
            step_rows,
            themes,
            plans,
        }
    }

    /// A store that reached IN_PROGRESS through its provisioning config.
    async fn configured_store(records: &TenantRecords) -> StoreId {
        records
            .plans
            .seed(
                PlanId::new("starter"),
                PlanCreate {
                    name: "Starter".to_string(),
                    monthly_price_cents: 0,
                },
            )
            .await
            .unwrap();
        let id = records
            .stores
            .create_store(StoreCreate {
                owner_id: OwnerId::new("owner_1"),
                owner_email: "owner@acme.test".to_string(),
                name: "Acme".to_string(),
                subdomain: "acme".to_string(),
                category: None,
            })
            .await
            .unwrap();
        records
            .stores
            .apply_provisioning_config(
                id,
                ProvisioningConfig {
                    theme_id: ThemeId::new("minimal"),
                    plan_id: PlanId::new("starter"),
                    subdomain: None,
                    domain: None,
                    category: "fashion".to_string(),
                    integrations: vec![],
                },
            )
            .await
            .unwrap();
        id
    }

    fn orchestrator(records: &TenantRecords) -> ProvisioningOrchestrator {
        let adapters = ProvisioningAdapters::local(&PlatformConfig::local(), records.themes.clone());
        ProvisioningOrchestrator::new(records.clone(), adapters, "noreply@storefront.test")
    }

    #[tokio::test]
    async fn test_store_stays_offline_when_row_cannot_complete() {
        let mut rows = MockClient::<MerchantProvisioning>::new();
        rows.expect_action()
            .return_err(FrameworkError::EntityError(Box::new(
                ProvisioningRecordError::InvalidTransition {
                    from: ProvisioningStatus::Failed,
                    to: ProvisioningStatus::Completed,
                },
            )));
        let records = records_with(ProvisioningClient::new(rows.client()));
        let id = configured_store(&records).await;

        let result = orchestrator(&records).complete(id).await;
        assert!(matches!(result, Err(ProvisioningError::Record(_))));

        let store = records.stores.fetch(id).await.unwrap();
        assert_eq!(store.provisioning_status, ProvisioningStatus::InProgress);
        assert!(!store.is_active);
        rows.verify();
    }

    #[tokio::test]
    async fn test_store_goes_live_after_row_completes() {
        let mut rows = MockClient::<MerchantProvisioning>::new();
        let mut done = MerchantProvisioning::new(StoreId(1), None);
        done.status = ProvisioningStatus::Completed;
        done.completion_percent = 100;
        rows.expect_action().return_ok(done);
        let records = records_with(ProvisioningClient::new(rows.client()));
        let id = configured_store(&records).await;
        assert_eq!(id, StoreId(1));

        let row = orchestrator(&records).complete(id).await.unwrap();
        assert_eq!(row.status, ProvisioningStatus::Completed);

        let store = records.stores.fetch(id).await.unwrap();
        assert_eq!(store.provisioning_status, ProvisioningStatus::Completed);
        assert!(store.is_active);
        rows.verify();
    }
}
