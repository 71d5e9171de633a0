use serde_json::{json, Value};
use storefront_provisioning::api::{ApiError, StepRequest};
use storefront_provisioning::config::PlatformConfig;
use storefront_provisioning::framework::ActorClient;
use storefront_provisioning::lifecycle::PlatformSystem;
use storefront_provisioning::model::{OnboardingStatus, OwnerId, StepKey};
use storefront_provisioning::onboarding::{OnboardingError, OnboardingSubject};

fn owner(id: &str) -> OnboardingSubject {
    OnboardingSubject::Owner {
        owner_id: OwnerId::new(id),
        email: format!("{id}@merchant.test"),
    }
}

fn full(data: Value) -> StepRequest {
    StepRequest {
        data,
        partial: false,
    }
}

fn partial(data: Value) -> StepRequest {
    StepRequest {
        data,
        partial: true,
    }
}

fn brand() -> Value {
    json!({ "brandName": "Acme Shop", "brandCategory": "fashion" })
}

fn business() -> Value {
    json!({ "legalName": "Acme LLC", "contactEmail": "ops@acme.test", "contactPhone": "+1 555 0100" })
}

fn storefront() -> Value {
    json!({ "storeName": "Acme Store", "themeStyle": "minimal", "logoUrl": "https://cdn.acme.test/logo.png" })
}

fn marketing() -> Value {
    json!({ "primaryGoal": "sales", "channels": ["instagram", "email"] })
}

fn confirmation() -> Value {
    json!({ "termsAccepted": true, "signatoryName": "Ada Lovelace" })
}

#[tokio::test]
async fn test_brand_basics_creates_store() {
    let system = PlatformSystem::start(PlatformConfig::local());
    let merchant = owner("ada");

    let before = system.api.get_onboarding(merchant.clone()).await.unwrap();
    assert_eq!(before.store_id, None);
    assert_eq!(before.status, OnboardingStatus::NotStarted);
    assert_eq!(before.missing.len(), 5);

    let view = system
        .api
        .put_onboarding_step(merchant.clone(), "BRAND_BASICS", full(brand()))
        .await
        .expect("Failed to save brand basics");
    assert_eq!(view.current_step, 1);
    assert_eq!(view.completion_percent, 20);
    assert_eq!(view.status, OnboardingStatus::InProgress);
    assert!(!view.missing.contains_key(&StepKey::BrandBasics));

    let store_id = view.store_id.expect("Store should have been created");
    let store = system.records.stores.fetch(store_id).await.unwrap();
    assert_eq!(store.subdomain, "acme-shop");
    assert_eq!(store.name, "Acme Shop");
    assert_eq!(store.category.as_deref(), Some("fashion"));
    assert_eq!(store.owner_email, "ada@merchant.test");
    assert_eq!(store.onboarding_status, OnboardingStatus::InProgress);
    assert!(!store.is_active);

    // Later requests by the same owner resolve the same store.
    let again = system.api.get_onboarding(merchant).await.unwrap();
    assert_eq!(again.store_id, Some(store_id));
}

#[tokio::test]
async fn test_subdomain_collision_gets_suffix() {
    let system = PlatformSystem::start(PlatformConfig::local());

    let first = system
        .api
        .put_onboarding_step(owner("ada"), "BRAND_BASICS", full(brand()))
        .await
        .unwrap();
    let second = system
        .api
        .put_onboarding_step(owner("grace"), "BRAND_BASICS", full(brand()))
        .await
        .unwrap();

    let first = system.records.stores.fetch(first.store_id.unwrap()).await.unwrap();
    let second = system.records.stores.fetch(second.store_id.unwrap()).await.unwrap();
    assert_eq!(first.subdomain, "acme-shop");
    assert_eq!(second.subdomain, "acme-shop-2");
}

#[tokio::test]
async fn test_store_required_before_other_steps() {
    let system = PlatformSystem::start(PlatformConfig::local());

    let error = system
        .api
        .put_onboarding_step(owner("ada"), "BUSINESS_DETAILS", full(business()))
        .await
        .expect_err("No store yet");
    assert!(matches!(
        error,
        ApiError::Onboarding(OnboardingError::Prerequisite(_))
    ));
    assert_eq!(error.status_code(), 422);
    assert!(system.records.stores.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_submissions_change_nothing() {
    let system = PlatformSystem::start(PlatformConfig::local());
    let merchant = owner("ada");
    let view = system
        .api
        .put_onboarding_step(merchant.clone(), "BRAND_BASICS", full(brand()))
        .await
        .unwrap();
    let store_id = view.store_id.unwrap();
    let saved = system.records.onboarding.fetch(store_id).await.unwrap();

    let unknown = system
        .api
        .put_onboarding_step(merchant.clone(), "PAYMENT", full(json!({})))
        .await
        .expect_err("Unknown step");
    assert!(matches!(unknown, ApiError::Onboarding(OnboardingError::InvalidStep(_))));
    assert_eq!(unknown.status_code(), 400);

    let skipped = system
        .api
        .put_onboarding_step(merchant.clone(), "MARKETING_INTENT", full(marketing()))
        .await
        .expect_err("Steps 2 and 3 are not done");
    assert!(matches!(
        skipped,
        ApiError::Onboarding(OnboardingError::OutOfOrder {
            step: StepKey::MarketingIntent,
            current_step: 1
        })
    ));
    assert_eq!(skipped.status_code(), 409);

    let incomplete = system
        .api
        .put_onboarding_step(
            merchant.clone(),
            "BUSINESS_DETAILS",
            full(json!({ "legalName": "Acme LLC", "contactEmail": "  " })),
        )
        .await
        .expect_err("Missing required fields");
    assert!(matches!(
        incomplete,
        ApiError::Onboarding(OnboardingError::Validation { ref missing, .. })
            if missing == &vec!["contactEmail", "contactPhone"]
    ));
    assert_eq!(incomplete.body()["missing"], json!(["contactEmail", "contactPhone"]));

    let malformed = system
        .api
        .put_onboarding_step(merchant, "BUSINESS_DETAILS", full(json!({ "legalName": 42 })))
        .await
        .expect_err("Wrong field type");
    assert!(matches!(
        malformed,
        ApiError::Onboarding(OnboardingError::MalformedData { .. })
    ));
    assert_eq!(malformed.status_code(), 400);

    assert_eq!(system.records.onboarding.fetch(store_id).await.unwrap(), saved);
    assert!(system.records.settings.get(store_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_partial_save_does_not_advance() {
    let system = PlatformSystem::start(PlatformConfig::local());
    let merchant = owner("ada");
    let store_id = system
        .api
        .put_onboarding_step(merchant.clone(), "BRAND_BASICS", full(brand()))
        .await
        .unwrap()
        .store_id
        .unwrap();

    let view = system
        .api
        .put_onboarding_step(
            merchant.clone(),
            "BUSINESS_DETAILS",
            partial(json!({ "legalName": "Acme LLC" })),
        )
        .await
        .expect("Partial save should be accepted");
    assert_eq!(view.current_step, 1);
    assert_eq!(view.completion_percent, 20);
    assert_eq!(
        view.missing.get(&StepKey::BusinessDetails),
        Some(&vec!["contactEmail", "contactPhone"])
    );
    let saved = view.step_data.business_details.expect("Partial data is kept");
    assert_eq!(saved.legal_name.as_deref(), Some("Acme LLC"));

    // No side effects for an incomplete step.
    assert!(system.records.settings.get(store_id).await.unwrap().is_none());

    let funnel = system.api.onboarding_funnel().await.unwrap();
    assert_eq!(funnel.len(), 5);
    assert_eq!(funnel[0].step, StepKey::BrandBasics);
    assert_eq!((funnel[0].completed, funnel[0].pending), (1, 0));
    assert_eq!((funnel[1].completed, funnel[1].pending), (0, 1));

    // Completing the step later flips its funnel row.
    system
        .api
        .put_onboarding_step(merchant, "BUSINESS_DETAILS", full(business()))
        .await
        .unwrap();
    let funnel = system.api.onboarding_funnel().await.unwrap();
    assert_eq!((funnel[1].completed, funnel[1].pending), (1, 0));
}

#[tokio::test]
async fn test_complete_steps_update_store_and_settings() {
    let system = PlatformSystem::start(PlatformConfig::local());
    let merchant = owner("ada");
    let store_id = system
        .api
        .put_onboarding_step(merchant.clone(), "BRAND_BASICS", full(brand()))
        .await
        .unwrap()
        .store_id
        .unwrap();

    system
        .api
        .put_onboarding_step(merchant.clone(), "BUSINESS_DETAILS", full(business()))
        .await
        .unwrap();
    let settings = system.records.settings.get(store_id).await.unwrap().unwrap();
    assert_eq!(settings.contact_email.as_deref(), Some("ops@acme.test"));
    assert_eq!(settings.contact_phone.as_deref(), Some("+1 555 0100"));
    assert_eq!(settings.currency, "USD");

    system
        .api
        .put_onboarding_step(merchant.clone(), "STOREFRONT_PREFERENCES", full(storefront()))
        .await
        .unwrap();
    let store = system.records.stores.fetch(store_id).await.unwrap();
    assert_eq!(store.name, "Acme Store");
    // The subdomain is fixed once the store exists.
    assert_eq!(store.subdomain, "acme-shop");
    let settings = system.records.settings.get(store_id).await.unwrap().unwrap();
    assert_eq!(settings.logo_url.as_deref(), Some("https://cdn.acme.test/logo.png"));
    assert_eq!(settings.contact_email.as_deref(), Some("ops@acme.test"));

    // Re-submitting an earlier step is allowed and keeps progress.
    let view = system
        .api
        .put_onboarding_step(
            merchant,
            "BRAND_BASICS",
            full(json!({ "brandName": "Acme Shop", "brandCategory": "apparel" })),
        )
        .await
        .unwrap();
    assert_eq!(view.current_step, 3);
    assert_eq!(view.completion_percent, 60);
    let store = system.records.stores.fetch(store_id).await.unwrap();
    assert_eq!(store.category.as_deref(), Some("apparel"));
}

#[tokio::test]
async fn test_submit_requires_every_step() {
    let system = PlatformSystem::start(PlatformConfig::local());
    let merchant = owner("ada");

    let no_store = system
        .api
        .submit_onboarding(merchant.clone())
        .await
        .expect_err("Nothing to submit");
    assert_eq!(no_store.status_code(), 422);

    let store_id = system
        .api
        .put_onboarding_step(merchant.clone(), "BRAND_BASICS", full(brand()))
        .await
        .unwrap()
        .store_id
        .unwrap();
    system
        .api
        .put_onboarding_step(merchant.clone(), "BUSINESS_DETAILS", full(business()))
        .await
        .unwrap();

    let early = system
        .api
        .submit_onboarding(merchant.clone())
        .await
        .expect_err("Three steps remain");
    match &early {
        ApiError::Onboarding(OnboardingError::Incomplete(missing)) => {
            let steps: Vec<StepKey> = missing.keys().copied().collect();
            assert_eq!(
                steps,
                vec![
                    StepKey::StorefrontPreferences,
                    StepKey::MarketingIntent,
                    StepKey::Confirmation
                ]
            );
        }
        other => panic!("Expected Incomplete, got {other:?}"),
    }
    assert_eq!(early.body()["missing"]["CONFIRMATION"], json!(["termsAccepted", "signatoryName"]));
    assert!(!system.records.stores.fetch(store_id).await.unwrap().is_active);

    for (key, data) in [
        ("STOREFRONT_PREFERENCES", storefront()),
        ("MARKETING_INTENT", marketing()),
        ("CONFIRMATION", confirmation()),
    ] {
        system
            .api
            .put_onboarding_step(merchant.clone(), key, full(data))
            .await
            .unwrap();
    }

    let view = system.api.submit_onboarding(merchant).await.expect("Submit failed");
    assert_eq!(view.status, OnboardingStatus::Completed);
    assert_eq!(view.completion_percent, 100);
    assert_eq!(view.current_step, 5);
    assert!(view.missing.is_empty());

    let store = system.records.stores.fetch(store_id).await.unwrap();
    assert!(store.is_active);
    assert_eq!(store.onboarding_status, OnboardingStatus::Completed);
}

#[tokio::test]
async fn test_store_subject_must_exist() {
    let system = PlatformSystem::start(PlatformConfig::local());

    let error = system
        .api
        .get_onboarding(OnboardingSubject::Store(storefront_provisioning::model::StoreId(7)))
        .await
        .expect_err("No such store");
    assert!(matches!(
        error,
        ApiError::Onboarding(OnboardingError::StoreNotFound(_))
    ));
    assert_eq!(error.status_code(), 404);
}
