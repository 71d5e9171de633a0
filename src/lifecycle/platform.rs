use crate::api::MerchantApi;
use crate::clients::{TenantRecords, ThemeClient};
use crate::config::PlatformConfig;
use crate::onboarding::OnboardingService;
use crate::provisioning::{ProvisioningAdapters, ProvisioningOrchestrator};
use crate::{
    catalog_actor, deployment_actor, onboarding_actor, provisioning_actor, settings_actor,
    store_actor,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
}

/// The running platform: every record actor plus the services wired on top of them.
///
/// # Example
///
/// ```ignore
/// let system = PlatformSystem::start(PlatformConfig::from_env()?);
/// let row = system.api.activate(store_id, request).await?;
/// system.shutdown().await?;
/// ```
pub struct PlatformSystem {
    pub config: PlatformConfig,
    pub records: TenantRecords,
    pub api: MerchantApi,
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl PlatformSystem {
    /// Starts the platform with the in-process adapters.
    pub fn start(config: PlatformConfig) -> Self {
        Self::start_with(config, ProvisioningAdapters::local)
    }

    /// Starts the platform with adapters built by `adapters` from the config and the
    /// theme catalog client.
    pub fn start_with(
        config: PlatformConfig,
        adapters: impl FnOnce(&PlatformConfig, ThemeClient) -> ProvisioningAdapters,
    ) -> Self {
        let buffer = config.actor_buffer;

        // 1. Create actors (no dependencies)
        let (theme_actor, themes) = catalog_actor::new_themes(buffer);
        let (plan_actor, plans) = catalog_actor::new_plans(buffer);
        let (store_actor, stores) = store_actor::new(buffer);
        let (provisioning_actor, provisioning) = provisioning_actor::new(buffer);
        let (deployment_actor, deployments) = deployment_actor::new(buffer);
        let (settings_actor, settings) = settings_actor::new(buffer);
        let (customization_actor, customizations) = settings_actor::new_customizations(buffer);
        let (onboarding_actor, onboarding) = onboarding_actor::new(buffer);
        let (step_row_actor, step_rows) = onboarding_actor::new_step_rows(buffer);

        // 2. Start actors with injected context. Stores validate plans.
        let handles = vec![
            tokio::spawn(theme_actor.run(())),
            tokio::spawn(plan_actor.run(())),
            tokio::spawn(store_actor.run(plans.clone())),
            tokio::spawn(provisioning_actor.run(())),
            tokio::spawn(deployment_actor.run(())),
            tokio::spawn(settings_actor.run(())),
            tokio::spawn(customization_actor.run(())),
            tokio::spawn(onboarding_actor.run(())),
            tokio::spawn(step_row_actor.run(())),
        ];

        let records = TenantRecords {
            stores,
            provisioning,
            deployments,
            settings,
            customizations,
            onboarding,
            step_rows,
            themes: themes.clone(),
            plans,
        };

        // 3. Services
        let adapters = adapters(&config, themes);
        let orchestrator =
            ProvisioningOrchestrator::new(records.clone(), adapters, config.notify_from.clone());
        let onboarding = OnboardingService::new(records.clone());
        let shutdown = CancellationToken::new();
        let api = MerchantApi::new(
            records.stores.clone(),
            orchestrator,
            onboarding,
            shutdown.clone(),
        );

        info!(actors = handles.len(), base_domain = %config.base_domain, "Platform started");
        Self {
            config,
            records,
            api,
            shutdown,
            handles,
        }
    }

    /// Cancels running provisioning at its next step boundary, closes every actor
    /// channel and waits for the actors to drain.
    ///
    /// Clients cloned out of the system keep their actor alive; drop them first.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down platform...");
        self.shutdown.cancel();

        drop(self.api);
        drop(self.records);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!("Platform shutdown complete.");
        Ok(())
    }
}
