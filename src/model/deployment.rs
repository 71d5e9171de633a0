use crate::model::StoreId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a merchant's workspace, dashboard and storefront live.
///
/// Created by the workspace step, then filled in (never replaced) by later steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentMetadata {
    pub store_id: StoreId,
    pub merchant_id: String,
    pub tenant_namespace: String,
    pub dashboard_url: Option<String>,
    pub website_url: Option<String>,
    pub theme_slug: Option<String>,
    pub deployment_config: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DeploymentCreate {
    pub merchant_id: String,
    pub tenant_namespace: String,
}

/// Partial update; `config_patch` keys are merged into `deployment_config`.
#[derive(Debug, Clone, Default)]
pub struct DeploymentUpdate {
    pub merchant_id: Option<String>,
    pub tenant_namespace: Option<String>,
    pub dashboard_url: Option<String>,
    pub website_url: Option<String>,
    pub theme_slug: Option<String>,
    pub config_patch: Option<serde_json::Map<String, serde_json::Value>>,
}
