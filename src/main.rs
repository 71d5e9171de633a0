//! Demo: a merchant walks through onboarding and activates their store.

use serde_json::json;
use storefront_provisioning::api::StepRequest;
use storefront_provisioning::config::PlatformConfig;
use storefront_provisioning::lifecycle::{setup_tracing, PlatformSystem};
use storefront_provisioning::model::{
    OwnerId, PlanCreate, PlanId, ProvisioningConfig, ThemeCreate, ThemeId,
};
use storefront_provisioning::onboarding::OnboardingSubject;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = PlatformConfig::from_env()?;
    info!(base_domain = %config.base_domain, "Starting storefront platform");
    let system = PlatformSystem::start(config);

    system
        .records
        .themes
        .seed(
            ThemeId::new("minimal"),
            ThemeCreate {
                slug: "minimal".to_string(),
                name: "Minimal".to_string(),
                default_customization: json!({ "hero": { "title": "Welcome" } }),
            },
        )
        .await?;
    system
        .records
        .plans
        .seed(
            PlanId::new("starter"),
            PlanCreate {
                name: "Starter".to_string(),
                monthly_price_cents: 2900,
            },
        )
        .await?;

    let subject = OnboardingSubject::Owner {
        owner_id: OwnerId::new("owner_1"),
        email: "merchant@acme.test".to_string(),
    };
    let steps = [
        ("BRAND_BASICS", json!({ "brandName": "Acme", "brandCategory": "fashion" })),
        (
            "BUSINESS_DETAILS",
            json!({ "legalName": "Acme LLC", "contactEmail": "ops@acme.test", "contactPhone": "+1 555 0100" }),
        ),
        ("STOREFRONT_PREFERENCES", json!({ "storeName": "Acme", "themeStyle": "minimal" })),
        ("MARKETING_INTENT", json!({ "primaryGoal": "sales", "channels": ["instagram"] })),
        ("CONFIRMATION", json!({ "termsAccepted": true, "signatoryName": "Ada" })),
    ];

    let span = tracing::info_span!("onboarding");
    let view = async {
        let mut last = None;
        for (key, data) in steps {
            let request = StepRequest {
                data,
                partial: false,
            };
            last = Some(system.api.put_onboarding_step(subject.clone(), key, request).await?);
        }
        system.api.submit_onboarding(subject.clone()).await?;
        Ok::<_, storefront_provisioning::api::ApiError>(last)
    }
    .instrument(span)
    .await?;

    let Some(store_id) = view.and_then(|v| v.store_id) else {
        return Err("onboarding did not create a store".into());
    };
    info!(store_id = %store_id, "Onboarding finished");

    let request = ProvisioningConfig {
        theme_id: ThemeId::new("minimal"),
        plan_id: PlanId::new("starter"),
        subdomain: None,
        domain: None,
        category: "fashion".to_string(),
        integrations: Vec::new(),
    };
    match system
        .api
        .activate(store_id, request)
        .instrument(tracing::info_span!("activation"))
        .await
    {
        Ok(activation) => info!(
            store_id = %store_id,
            status = %activation.provisioning.status,
            percent = activation.provisioning.completion_percent,
            "Store activated"
        ),
        Err(e) => error!(status = e.status_code(), error = %e, "Activation failed"),
    }

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
