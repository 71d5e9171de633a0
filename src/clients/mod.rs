//! Typed clients wrapping [`ResourceClient`](crate::framework::ResourceClient) per record type.
//!
//! [`TenantRecords`] bundles them: it is the tenant record store seen by the
//! orchestrator and the onboarding service.

pub mod catalog_client;
pub mod deployment_client;
pub mod onboarding_client;
pub mod provisioning_client;
pub mod settings_client;
pub mod store_client;

pub use catalog_client::*;
pub use deployment_client::*;
pub use onboarding_client::*;
pub use provisioning_client::*;
pub use settings_client::*;
pub use store_client::*;

/// Every record client, cloned into the services that need them.
#[derive(Clone)]
pub struct TenantRecords {
    pub stores: StoreClient,
    pub provisioning: ProvisioningClient,
    pub deployments: DeploymentClient,
    pub settings: SettingsClient,
    pub customizations: CustomizationClient,
    pub onboarding: OnboardingClient,
    pub step_rows: StepRowClient,
    pub themes: ThemeClient,
    pub plans: PlanClient,
}
