//! Conditional transitions of a [`Store`](crate::model::Store).
//!
//! These run inside the Store actor, so each check-and-write is atomic.
//! See [`impl ActorEntity for Store`](crate::model::Store#impl-ActorEntity-for-Store).

use crate::model::ProvisioningConfig;

#[derive(Debug, Clone)]
pub enum StoreAction {
    /// Write theme, plan, category, subdomain and domain, after checking the plan
    /// exists, and move provisioning to IN_PROGRESS.
    ApplyProvisioningConfig(ProvisioningConfig),
    MarkProvisioningFailed,
    /// Provisioning COMPLETED and the store goes live.
    MarkProvisioned,
    /// Final onboarding submission: onboarding COMPLETED and the store goes live.
    CompleteOnboarding,
    /// Admin override of the activation rule.
    ForceActivate,
}
