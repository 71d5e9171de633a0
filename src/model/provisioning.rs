//! Provisioning run state: status machine, pipeline steps and the progress record.

use crate::model::{PlanId, StoreId, ThemeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lifecycle of a provisioning run, shared by the progress record and the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvisioningStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl ProvisioningStatus {
    /// `{PENDING | FAILED} -> IN_PROGRESS -> {COMPLETED | FAILED}`, and `FAILED -> PENDING`
    /// for retry.
    pub fn can_transition_to(self, next: ProvisioningStatus) -> bool {
        use ProvisioningStatus::*;
        matches!(
            (self, next),
            (Pending | Failed, InProgress)
                | (InProgress, Completed)
                | (InProgress, Failed)
                | (Failed, Pending)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProvisioningStatus::Pending => "PENDING",
            ProvisioningStatus::InProgress => "IN_PROGRESS",
            ProvisioningStatus::Completed => "COMPLETED",
            ProvisioningStatus::Failed => "FAILED",
        }
    }
}

impl Display for ProvisioningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pipeline checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvisioningStep {
    StoreConfigured,
    WorkspaceCreated,
    DashboardCreated,
    WebsiteDeployed,
    CustomizationCreated,
    DataInitialized,
    CredentialsSent,
    Completed,
}

impl ProvisioningStep {
    /// Every step, in execution order.
    pub const PIPELINE: [ProvisioningStep; 8] = [
        ProvisioningStep::StoreConfigured,
        ProvisioningStep::WorkspaceCreated,
        ProvisioningStep::DashboardCreated,
        ProvisioningStep::WebsiteDeployed,
        ProvisioningStep::CustomizationCreated,
        ProvisioningStep::DataInitialized,
        ProvisioningStep::CredentialsSent,
        ProvisioningStep::Completed,
    ];

    pub fn checkpoint_percent(self) -> u8 {
        match self {
            ProvisioningStep::StoreConfigured => 10,
            ProvisioningStep::WorkspaceCreated => 25,
            ProvisioningStep::DashboardCreated => 40,
            ProvisioningStep::WebsiteDeployed => 60,
            ProvisioningStep::CustomizationCreated => 70,
            ProvisioningStep::DataInitialized => 80,
            ProvisioningStep::CredentialsSent => 95,
            ProvisioningStep::Completed => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProvisioningStep::StoreConfigured => "STORE_CONFIGURED",
            ProvisioningStep::WorkspaceCreated => "WORKSPACE_CREATED",
            ProvisioningStep::DashboardCreated => "DASHBOARD_CREATED",
            ProvisioningStep::WebsiteDeployed => "WEBSITE_DEPLOYED",
            ProvisioningStep::CustomizationCreated => "CUSTOMIZATION_CREATED",
            ProvisioningStep::DataInitialized => "DATA_INITIALIZED",
            ProvisioningStep::CredentialsSent => "CREDENTIALS_SENT",
            ProvisioningStep::Completed => "COMPLETED",
        }
    }
}

impl Display for ProvisioningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation request: what the merchant's storefront should be built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningConfig {
    pub theme_id: ThemeId,
    pub plan_id: PlanId,
    #[serde(default)]
    pub subdomain: Option<String>,
    /// Custom domain; takes precedence over the platform subdomain for the website URL.
    #[serde(default)]
    pub domain: Option<String>,
    pub category: String,
    #[serde(default)]
    pub integrations: Vec<String>,
}

/// Failure captured on the progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLog {
    pub message: String,
    pub step: Option<ProvisioningStep>,
    /// Backtrace when one was captured, otherwise the error's source chain.
    pub stack: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorLog {
    pub fn capture(step: Option<ProvisioningStep>, error: &(dyn std::error::Error + 'static)) -> Self {
        let backtrace = std::backtrace::Backtrace::capture();
        let stack = if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            Some(backtrace.to_string())
        } else {
            let mut chain = Vec::new();
            let mut source = error.source();
            while let Some(cause) = source {
                chain.push(cause.to_string());
                source = cause.source();
            }
            (!chain.is_empty()).then(|| chain.join("\ncaused by: "))
        };
        Self {
            message: error.to_string(),
            step,
            stack,
            timestamp: Utc::now(),
        }
    }
}

/// Progress record of a store's provisioning, one per store, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantProvisioning {
    pub store_id: StoreId,
    pub status: ProvisioningStatus,
    pub current_step: Option<ProvisioningStep>,
    pub completion_percent: u8,
    pub workspace_created: bool,
    pub dashboard_created: bool,
    pub website_deployed: bool,
    pub data_initialized: bool,
    pub credentials_sent: bool,
    pub error_log: Option<ErrorLog>,
    /// Error logs of earlier failed runs, oldest first.
    pub error_history: Vec<ErrorLog>,
    pub retry_count: u32,
    pub requested_config: Option<ProvisioningConfig>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl MerchantProvisioning {
    pub fn new(store_id: StoreId, requested_config: Option<ProvisioningConfig>) -> Self {
        Self {
            store_id,
            status: ProvisioningStatus::Pending,
            current_step: None,
            completion_percent: 0,
            workspace_created: false,
            dashboard_created: false,
            website_deployed: false,
            data_initialized: false,
            credentials_sent: false,
            error_log: None,
            error_history: Vec::new(),
            retry_count: 0,
            requested_config,
            started_at: None,
            completed_at: None,
            updated_at: Utc::now(),
        }
    }
}

/// Payload creating the progress record (and refreshing its config snapshot).
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    pub requested_config: Option<ProvisioningConfig>,
}
