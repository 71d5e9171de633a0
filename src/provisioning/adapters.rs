//! Deployment targets used by the pipeline.
//!
//! Each adapter returns a value or an error, never a partial result. The local
//! implementations derive everything from ids and configuration, so they are safe to
//! call again on retry.

use super::AdapterError;
use crate::clients::ThemeClient;
use crate::config::PlatformConfig;
use crate::framework::ActorClient;
use crate::model::{StoreId, ThemeId};
use crate::notification::{LogNotifier, Notifier};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub merchant_id: String,
    pub tenant_namespace: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebsiteDeployment {
    pub url: String,
    pub theme_slug: String,
}

#[async_trait]
pub trait WorkspaceProvisioner: Send + Sync {
    async fn create_workspace(&self, store_id: StoreId) -> Result<Workspace, AdapterError>;
}

#[async_trait]
pub trait DashboardProvisioner: Send + Sync {
    async fn create_dashboard(
        &self,
        store_id: StoreId,
        merchant_id: &str,
    ) -> Result<Dashboard, AdapterError>;
}

#[async_trait]
pub trait WebsiteDeployer: Send + Sync {
    /// Fails with [`AdapterError::ThemeNotFound`] when `theme_id` does not resolve.
    async fn deploy_website(
        &self,
        store_id: StoreId,
        theme_id: &ThemeId,
        subdomain: &str,
        custom_domain: Option<&str>,
    ) -> Result<WebsiteDeployment, AdapterError>;
}

/// Allocates a fresh opaque merchant id per call.
#[derive(Debug, Default, Clone)]
pub struct LocalWorkspaces;

#[async_trait]
impl WorkspaceProvisioner for LocalWorkspaces {
    #[instrument(skip(self))]
    async fn create_workspace(&self, store_id: StoreId) -> Result<Workspace, AdapterError> {
        let merchant = Uuid::new_v4();
        debug!(%merchant, "Workspace allocated");
        Ok(Workspace {
            merchant_id: merchant.to_string(),
            tenant_namespace: format!("tenant_{}", merchant.simple()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct LocalDashboards {
    base_url: String,
}

impl LocalDashboards {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DashboardProvisioner for LocalDashboards {
    async fn create_dashboard(
        &self,
        _store_id: StoreId,
        merchant_id: &str,
    ) -> Result<Dashboard, AdapterError> {
        Ok(Dashboard {
            url: format!("{}/{}", self.base_url.trim_end_matches('/'), merchant_id),
        })
    }
}

/// Serves storefronts at the custom domain, else at `<subdomain>.<base_domain>`.
#[derive(Clone)]
pub struct LocalWebsites {
    base_domain: String,
    themes: ThemeClient,
}

impl LocalWebsites {
    pub fn new(base_domain: impl Into<String>, themes: ThemeClient) -> Self {
        Self {
            base_domain: base_domain.into(),
            themes,
        }
    }
}

#[async_trait]
impl WebsiteDeployer for LocalWebsites {
    #[instrument(skip(self))]
    async fn deploy_website(
        &self,
        _store_id: StoreId,
        theme_id: &ThemeId,
        subdomain: &str,
        custom_domain: Option<&str>,
    ) -> Result<WebsiteDeployment, AdapterError> {
        let theme = self
            .themes
            .get(theme_id.clone())
            .await
            .map_err(|e| AdapterError::Unavailable(e.to_string()))?
            .ok_or_else(|| AdapterError::ThemeNotFound(theme_id.clone()))?;

        let url = match custom_domain.map(str::trim).filter(|d| !d.is_empty()) {
            Some(domain) => domain.to_string(),
            None => format!("{}.{}", subdomain, self.base_domain),
        };
        Ok(WebsiteDeployment {
            url,
            theme_slug: theme.slug,
        })
    }
}

/// The external collaborators of one orchestrator.
#[derive(Clone)]
pub struct ProvisioningAdapters {
    pub workspaces: Arc<dyn WorkspaceProvisioner>,
    pub dashboards: Arc<dyn DashboardProvisioner>,
    pub websites: Arc<dyn WebsiteDeployer>,
    pub notifier: Arc<dyn Notifier>,
}

impl ProvisioningAdapters {
    /// In-process adapters driven by `config`; emails go to the log.
    pub fn local(config: &PlatformConfig, themes: ThemeClient) -> Self {
        Self {
            workspaces: Arc::new(LocalWorkspaces),
            dashboards: Arc::new(LocalDashboards::new(config.dashboard_base_url.clone())),
            websites: Arc::new(LocalWebsites::new(config.base_domain.clone(), themes)),
            notifier: Arc::new(LogNotifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::model::Theme;

    #[tokio::test]
    async fn test_workspace_namespace_follows_merchant_id() {
        let workspace = LocalWorkspaces.create_workspace(StoreId(1)).await.unwrap();
        let merchant = Uuid::parse_str(&workspace.merchant_id).unwrap();
        assert_eq!(workspace.tenant_namespace, format!("tenant_{}", merchant.simple()));
    }

    #[tokio::test]
    async fn test_dashboard_url_is_under_base() {
        let dashboards = LocalDashboards::new("https://dash.example.com/m/");
        let dashboard = dashboards.create_dashboard(StoreId(1), "abc").await.unwrap();
        assert_eq!(dashboard.url, "https://dash.example.com/m/abc");
    }

    #[tokio::test]
    async fn test_website_prefers_custom_domain() {
        let mut themes = MockClient::<Theme>::new();
        let theme = Theme {
            id: ThemeId::new("minimal"),
            slug: "minimal".to_string(),
            name: "Minimal".to_string(),
            default_customization: serde_json::json!({}),
        };
        themes.expect_get().return_ok(Some(theme.clone()));
        themes.expect_get().return_ok(Some(theme));
        let websites = LocalWebsites::new("storefront.local", ThemeClient::new(themes.client()));

        let on_subdomain = websites
            .deploy_website(StoreId(1), &ThemeId::new("minimal"), "acme", None)
            .await
            .unwrap();
        assert_eq!(on_subdomain.url, "acme.storefront.local");

        let custom = websites
            .deploy_website(StoreId(1), &ThemeId::new("minimal"), "acme", Some("shop.acme.com"))
            .await
            .unwrap();
        assert_eq!(custom.url, "shop.acme.com");
        assert_eq!(custom.theme_slug, "minimal");
        themes.verify();
    }

    #[tokio::test]
    async fn test_unknown_theme_is_reported() {
        let mut themes = MockClient::<Theme>::new();
        themes.expect_get().return_ok(None);
        let websites = LocalWebsites::new("storefront.local", ThemeClient::new(themes.client()));

        let result = websites
            .deploy_website(StoreId(1), &ThemeId::new("missing"), "acme", None)
            .await;
        assert_eq!(result, Err(AdapterError::ThemeNotFound(ThemeId::new("missing"))));
    }
}
