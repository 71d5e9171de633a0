//! The merchant-facing onboarding wizard.
//!
//! Step submissions are validated against the typed step record, checked for order
//! (never past the step after the highest completed one) and saved through one
//! atomic action on the onboarding record. Side effects on the store and its settings
//! are applied only after that action saved the step as complete.

use super::slug::{candidate, slugify};
use super::OnboardingError;
use crate::clients::TenantRecords;
use crate::framework::ActorClient;
use crate::model::{
    BrandBasics, BrandOnboarding, MissingFields, OnboardingStatus, OwnerId, StepData, StepKey,
    StepRowId, StepRowStatus, StepSubmission, Store, StoreCreate, StoreId, StoreSettingsUpdate,
    StoreUpdate,
};
use crate::store_actor::StoreError;
use serde::Serialize;
use tracing::{debug, info, instrument};

const MAX_SUBDOMAIN_ATTEMPTS: u32 = 100;

/// Whose onboarding a request is about.
#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingSubject {
    Store(StoreId),
    /// A merchant who may not have a store yet; `BRAND_BASICS` creates it.
    Owner { owner_id: OwnerId, email: String },
}

impl From<StoreId> for OnboardingSubject {
    fn from(id: StoreId) -> Self {
        OnboardingSubject::Store(id)
    }
}

/// Onboarding progress as shown to the merchant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingView {
    pub store_id: Option<StoreId>,
    pub status: OnboardingStatus,
    pub current_step: u8,
    pub completion_percent: u8,
    pub step_data: StepData,
    pub missing: MissingFields,
}

impl OnboardingView {
    fn not_started() -> Self {
        Self::from(&BrandOnboarding::new(StoreId(0), None)).without_store()
    }

    fn without_store(mut self) -> Self {
        self.store_id = None;
        self
    }
}

impl From<&BrandOnboarding> for OnboardingView {
    fn from(onboarding: &BrandOnboarding) -> Self {
        Self {
            store_id: Some(onboarding.store_id),
            status: onboarding.status,
            current_step: onboarding.current_step,
            completion_percent: onboarding.completion_percent,
            step_data: onboarding.step_data.clone(),
            missing: onboarding.missing(),
        }
    }
}

/// Funnel row: how many stores reached each step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub step: StepKey,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Clone)]
pub struct OnboardingService {
    records: TenantRecords,
}

impl OnboardingService {
    pub fn new(records: TenantRecords) -> Self {
        Self { records }
    }

    /// Saves one wizard step.
    ///
    /// `allow_partial` accepts a step with missing required fields; it is stored but
    /// does not count as complete and triggers no side effects.
    #[instrument(skip(self, data))]
    pub async fn submit_step(
        &self,
        subject: OnboardingSubject,
        step_key: &str,
        data: serde_json::Value,
        allow_partial: bool,
    ) -> Result<OnboardingView, OnboardingError> {
        let key: StepKey = step_key
            .parse()
            .map_err(|_| OnboardingError::InvalidStep(step_key.to_string()))?;
        let submission = StepSubmission::from_json(key, data).map_err(|e| {
            OnboardingError::MalformedData {
                step: key,
                reason: e.to_string(),
            }
        })?;
        let missing = submission.missing_fields();
        if !missing.is_empty() && !allow_partial {
            return Err(OnboardingError::Validation { step: key, missing });
        }

        let store = match self.resolve_store(&subject).await? {
            Some(store) => store,
            None => self.bootstrap_store(&subject, &submission).await?,
        };

        let current = self
            .records
            .onboarding
            .get(store.id)
            .await?
            .unwrap_or_else(|| BrandOnboarding::new(store.id, store.category.clone()));
        if !current.allows(key) {
            return Err(OnboardingError::OutOfOrder {
                step: key,
                current_step: current.current_step,
            });
        }

        self.records
            .onboarding
            .ensure(store.id, store.category.clone())
            .await?;
        let (complete, onboarding) = self
            .records
            .onboarding
            .save_step(store.id, submission.clone())
            .await?;
        // Only a step the record accepted as complete touches the store and settings.
        if complete {
            self.apply_side_effects(store.id, &submission).await?;
        }

        let row_status = if complete {
            StepRowStatus::Completed
        } else {
            StepRowStatus::Pending
        };
        self.records
            .step_rows
            .record(
                StepRowId {
                    store_id: store.id,
                    step: key,
                },
                row_status,
            )
            .await?;

        let store_status = if onboarding.status == OnboardingStatus::Completed {
            OnboardingStatus::Completed
        } else {
            OnboardingStatus::InProgress
        };
        self.records
            .stores
            .update_store(
                store.id,
                StoreUpdate {
                    onboarding_status: Some(store_status),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            store_id = %store.id,
            step = %key,
            complete,
            percent = onboarding.completion_percent,
            "Onboarding step saved"
        );
        Ok(OnboardingView::from(&onboarding))
    }

    /// Final submission. Requires every step complete; the store then goes live.
    #[instrument(skip(self))]
    pub async fn submit(&self, subject: OnboardingSubject) -> Result<OnboardingView, OnboardingError> {
        let store = self
            .resolve_store(&subject)
            .await?
            .ok_or_else(|| OnboardingError::Prerequisite("No store exists yet".to_string()))?;

        self.records
            .onboarding
            .ensure(store.id, store.category.clone())
            .await?;
        let onboarding = self.records.onboarding.mark_submitted(store.id).await?;
        self.records.stores.complete_onboarding(store.id).await?;

        info!(store_id = %store.id, "Onboarding submitted");
        Ok(OnboardingView::from(&onboarding))
    }

    pub async fn get(&self, subject: OnboardingSubject) -> Result<OnboardingView, OnboardingError> {
        let Some(store) = self.resolve_store(&subject).await? else {
            return Ok(OnboardingView::not_started());
        };
        Ok(match self.records.onboarding.get(store.id).await? {
            Some(onboarding) => OnboardingView::from(&onboarding),
            None => OnboardingView::from(&BrandOnboarding::new(store.id, store.category)),
        })
    }

    /// Per step, in wizard order: stores that completed it and stores with a partial save.
    pub async fn funnel(&self) -> Result<Vec<FunnelStage>, OnboardingError> {
        let rows = self.records.step_rows.list().await?;
        Ok(StepKey::ALL
            .into_iter()
            .map(|step| {
                let (completed, pending) = rows
                    .iter()
                    .filter(|row| row.id.step == step)
                    .fold((0, 0), |(done, open), row| match row.status {
                        StepRowStatus::Completed => (done + 1, open),
                        StepRowStatus::Pending => (done, open + 1),
                    });
                FunnelStage {
                    step,
                    completed,
                    pending,
                }
            })
            .collect())
    }

    async fn resolve_store(&self, subject: &OnboardingSubject) -> Result<Option<Store>, OnboardingError> {
        match subject {
            OnboardingSubject::Store(id) => {
                let store = self.records.stores.fetch(*id).await?;
                Ok(Some(store))
            }
            OnboardingSubject::Owner { owner_id, .. } => {
                Ok(self.records.stores.find_by_owner(owner_id).await?)
            }
        }
    }

    /// Creates the owner's store from a `BRAND_BASICS` submission with a brand name.
    async fn bootstrap_store(
        &self,
        subject: &OnboardingSubject,
        submission: &StepSubmission,
    ) -> Result<Store, OnboardingError> {
        let (OnboardingSubject::Owner { owner_id, email }, StepSubmission::BrandBasics(brand)) =
            (subject, submission)
        else {
            return Err(OnboardingError::Prerequisite(
                "Complete BRAND_BASICS to create your store first".to_string(),
            ));
        };
        let Some(brand_name) = brand.brand_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
        else {
            return Err(OnboardingError::Prerequisite(
                "A brand name is required to create your store".to_string(),
            ));
        };

        let base = slugify(brand_name);
        for attempt in 1..=MAX_SUBDOMAIN_ATTEMPTS {
            let subdomain = candidate(&base, attempt);
            let params = StoreCreate {
                owner_id: owner_id.clone(),
                owner_email: email.clone(),
                name: brand_name.to_string(),
                subdomain: subdomain.clone(),
                category: category_of(brand),
            };
            match self.records.stores.create_store(params).await {
                Ok(id) => {
                    info!(store_id = %id, %subdomain, "Store created from onboarding");
                    return Ok(self.records.stores.fetch(id).await?);
                }
                Err(StoreError::SubdomainTaken(_)) => {
                    debug!(%subdomain, "Subdomain taken, trying next");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(OnboardingError::Record(format!(
            "no free subdomain for {base} after {MAX_SUBDOMAIN_ATTEMPTS} attempts"
        )))
    }

    async fn apply_side_effects(
        &self,
        store_id: StoreId,
        submission: &StepSubmission,
    ) -> Result<(), OnboardingError> {
        match submission {
            StepSubmission::BrandBasics(brand) => {
                self.records
                    .stores
                    .update_store(
                        store_id,
                        StoreUpdate {
                            name: brand.brand_name.clone(),
                            category: category_of(brand),
                            ..Default::default()
                        },
                    )
                    .await?;
            }
            StepSubmission::BusinessDetails(details) => {
                self.records
                    .settings
                    .update_contact(
                        store_id,
                        StoreSettingsUpdate {
                            contact_email: details.contact_email.clone(),
                            contact_phone: details.contact_phone.clone(),
                            ..Default::default()
                        },
                    )
                    .await?;
            }
            StepSubmission::StorefrontPreferences(prefs) => {
                self.records
                    .stores
                    .update_store(
                        store_id,
                        StoreUpdate {
                            name: prefs.store_name.clone(),
                            custom_domain: prefs.custom_domain.clone().filter(|d| !d.trim().is_empty()),
                            ..Default::default()
                        },
                    )
                    .await?;
                if let Some(logo_url) = prefs.logo_url.clone() {
                    self.records
                        .settings
                        .update_contact(
                            store_id,
                            StoreSettingsUpdate {
                                logo_url: Some(logo_url),
                                ..Default::default()
                            },
                        )
                        .await?;
                }
            }
            StepSubmission::MarketingIntent(_) | StepSubmission::Confirmation(_) => {}
        }
        Ok(())
    }
}

fn category_of(brand: &BrandBasics) -> Option<String> {
    brand
        .brand_category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
